pub mod attachment;
pub mod auth;
pub mod config;
pub mod intake;
pub mod metrics;
pub mod query;
pub mod ticket;

pub use attachment::{AttachmentError, AttachmentStore, UploadedFile};
pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, Identity, NoneAuthenticator,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, Config, ConfigError,
    SanitizedConfig,
};
pub use intake::{ClientInfo, IntakeError, TicketIntake, TicketSubmission, ValidationErrors};
pub use query::{filter_records, DateBounds, FilterCriteria};
pub use ticket::{CsvTicketStore, TicketError, TicketRecord, TicketStore};
