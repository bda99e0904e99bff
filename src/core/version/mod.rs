pub mod descriptor;
pub mod manifest;
pub mod resolver;

pub use descriptor::{
    ArgumentDialect, ArgumentEntry, ArgumentValue, AssetIndexRef, DownloadArtifact,
    ExtractRules, LibraryArtifact, LibraryDownloads, LibraryEntry, ModernArguments,
    VersionDescriptor, VersionDownloads,
};
pub use manifest::{VersionEntry, VersionManifest};
pub use resolver::{LoaderFlavor, ResolvedVersion, VersionResolver};
