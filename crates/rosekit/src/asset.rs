//! Format detection and a tagged union over every supported asset.

use std::path::Path;

use rosekit_chr::ChrFile;
use rosekit_ifo::IfoFile;
use rosekit_zmd::ZmdFile;
use rosekit_zmo::ZmoFile;
use rosekit_zsc::ZscFile;

use crate::{Error, Result};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssetKind {
    Skeleton,
    Motion,
    SceneObjects,
    Characters,
    Map,
}

impl AssetKind {
    /// All supported kinds.
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Skeleton,
        AssetKind::Motion,
        AssetKind::SceneObjects,
        AssetKind::Characters,
        AssetKind::Map,
    ];

    /// Detect the kind from a file extension, ignoring case.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(extension))
    }

    /// Get the lowercase file extension.
    pub const fn extension(self) -> &'static str {
        match self {
            AssetKind::Skeleton => "zmd",
            AssetKind::Motion => "zmo",
            AssetKind::SceneObjects => "zsc",
            AssetKind::Characters => "chr",
            AssetKind::Map => "ifo",
        }
    }

    /// Get a human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            AssetKind::Skeleton => "skeleton",
            AssetKind::Motion => "motion",
            AssetKind::SceneObjects => "scene objects",
            AssetKind::Characters => "characters",
            AssetKind::Map => "map",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Any decoded asset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "data"))]
pub enum Asset {
    Skeleton(ZmdFile),
    Motion(ZmoFile),
    SceneObjects(ZscFile),
    Characters(ChrFile),
    Map(IfoFile),
}

impl Asset {
    /// Load an asset from disk, choosing the codec by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let kind = AssetKind::from_path(path).ok_or_else(|| Error::UnknownKind(path.to_path_buf()))?;
        let data = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), %kind, bytes = data.len(), "loading asset");
        Self::parse(kind, &data)
    }

    /// Decode bytes as the given kind.
    pub fn parse(kind: AssetKind, data: &[u8]) -> Result<Self> {
        Ok(match kind {
            AssetKind::Skeleton => Asset::Skeleton(ZmdFile::parse(data)?),
            AssetKind::Motion => Asset::Motion(ZmoFile::parse(data)?),
            AssetKind::SceneObjects => Asset::SceneObjects(ZscFile::parse(data)?),
            AssetKind::Characters => Asset::Characters(ChrFile::parse(data)?),
            AssetKind::Map => Asset::Map(IfoFile::parse(data)?),
        })
    }

    /// Encode back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(match self {
            Asset::Skeleton(zmd) => zmd.to_bytes()?,
            Asset::Motion(zmo) => zmo.to_bytes()?,
            Asset::SceneObjects(zsc) => zsc.to_bytes()?,
            Asset::Characters(chr) => chr.to_bytes()?,
            Asset::Map(ifo) => ifo.to_bytes()?,
        })
    }

    /// Get the kind of this asset.
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Skeleton(_) => AssetKind::Skeleton,
            Asset::Motion(_) => AssetKind::Motion,
            Asset::SceneObjects(_) => AssetKind::SceneObjects,
            Asset::Characters(_) => AssetKind::Characters,
            Asset::Map(_) => AssetKind::Map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(AssetKind::from_path("3Ddata/NPC/Male.ZMD"), Some(AssetKind::Skeleton));
        assert_eq!(AssetKind::from_path("motion/walk.zmo"), Some(AssetKind::Motion));
        assert_eq!(AssetKind::from_path("list_deco.zsc"), Some(AssetKind::SceneObjects));
        assert_eq!(AssetKind::from_path("list_npc.CHR"), Some(AssetKind::Characters));
        assert_eq!(AssetKind::from_path("maps/31_32.ifo"), Some(AssetKind::Map));
        assert_eq!(AssetKind::from_path("readme.txt"), None);
        assert_eq!(AssetKind::from_path("zmd"), None);
    }

    #[test]
    fn test_parse_and_reencode() {
        let zmo = ZmoFile::new(24, 0);
        let bytes = zmo.to_bytes().unwrap();

        let asset = Asset::parse(AssetKind::Motion, &bytes).unwrap();
        assert_eq!(asset.kind(), AssetKind::Motion);
        assert_eq!(asset, Asset::Motion(zmo));
        assert_eq!(asset.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_parse_error_is_tagged() {
        let err = Asset::parse(AssetKind::Skeleton, b"ZMD0009").unwrap_err();
        assert!(matches!(err, Error::Zmd(rosekit_zmd::Error::UnsupportedVersion('9'))));
        assert!(err.to_string().starts_with("skeleton:"));
    }

    #[test]
    fn test_load_unknown_kind() {
        assert!(matches!(
            Asset::load("notes.txt"),
            Err(Error::UnknownKind(_))
        ));
    }
}
