pub mod assessment;
pub mod claim;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod logging;
pub mod media;
pub mod secrets;
pub mod storage;
pub mod workflow;

pub use assessment::{
    AssessmentError, AssessmentGenerator, AssessmentKind, AssessmentProvider, AssessmentResponse,
};
pub use claim::{Claim, ClaimStatus, DisplayStatus, IdGenerator, MediaFile, MediaKind};
pub use clock::{Clock, SystemClock};
pub use config::{load_config, load_or_default, Config};
pub use error::{
    ClaimDeskError, ConfigError, LifecycleError, MediaError, Result, StorageError, ValidationError,
};
pub use events::{ClaimEvent, ClaimEventBroadcaster, ClaimEventKind};
pub use logging::{init_logging, LoggingOptions};
pub use media::MediaUpload;
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
pub use storage::{BlobStore, ClaimRepository, Stores};
pub use workflow::{ClaimDesk, MediaPreview, UploadFailure, UploadReport};
