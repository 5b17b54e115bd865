use sea_orm::DbErr;
use std::fmt;

/// Error taxonomy the external CRUD layer maps store failures into.
///
/// The engine itself performs no retries and no local recovery: every store
/// failure propagates upward as `DbErr` and is translated at this boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessError {
    /// Resource not found
    NotFound { resource: String, id: String },
    /// Unique-constraint conflict
    Duplicate { resource: String, constraint: String },
    /// Foreign key references a row that does not exist
    MissingReference { resource: String, message: String },
    /// Store unreachable or connection-level failure
    ExternalServiceError { service: String, message: String },
    /// Generic application error
    InternalError { message: String },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            BusinessError::Duplicate {
                resource,
                constraint,
            } => {
                write!(f, "{resource} violating '{constraint}' already exists")
            }
            BusinessError::MissingReference { resource, message } => {
                write!(f, "{resource} references a missing row: {message}")
            }
            BusinessError::ExternalServiceError { service, message } => {
                write!(f, "External service '{service}' error: {message}")
            }
            BusinessError::InternalError { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for BusinessError {}

pub struct ErrorMapper;

impl ErrorMapper {
    /// Map `DbErr` to a business error, with `context` naming the resource
    /// being written (e.g. `"biospecimen"`).
    pub fn map_db_error(err: DbErr, context: &str) -> BusinessError {
        let resource = context.replace('_', " ");
        match err {
            DbErr::RecordNotFound(msg) => BusinessError::NotFound {
                resource,
                id: Self::extract_id_from_message(&msg),
            },
            DbErr::Conn(conn_err) => BusinessError::ExternalServiceError {
                service: "database".to_string(),
                message: conn_err.to_string(),
            },
            DbErr::Exec(exec_err) => Self::classify_constraint(&resource, &exec_err.to_string()),
            DbErr::Query(query_err) => Self::classify_constraint(&resource, &query_err.to_string()),
            other => BusinessError::InternalError {
                message: other.to_string(),
            },
        }
    }

    /// Postgres and SQLite phrase constraint violations differently; match
    /// both spellings.
    fn classify_constraint(resource: &str, message: &str) -> BusinessError {
        if message.contains("duplicate key") || message.contains("UNIQUE constraint") {
            BusinessError::Duplicate {
                resource: resource.to_string(),
                constraint: Self::extract_constraint_name(message),
            }
        } else if message.contains("violates foreign key constraint")
            || message.contains("FOREIGN KEY constraint")
        {
            BusinessError::MissingReference {
                resource: resource.to_string(),
                message: message.to_string(),
            }
        } else {
            BusinessError::InternalError {
                message: message.to_string(),
            }
        }
    }

    /// Pull the quoted constraint name out of a Postgres message like
    /// `duplicate key value violates unique constraint "uq_samples_natural_key"`.
    fn extract_constraint_name(message: &str) -> String {
        message
            .split('"')
            .nth(1)
            .unwrap_or("unique constraint")
            .to_string()
    }

    /// Extract a UUID or integer id from messages like
    /// `Sample with id 'abc-123' not found`.
    fn extract_id_from_message(msg: &str) -> String {
        msg.split_whitespace()
            .find_map(|word| {
                let cleaned = word.trim_matches('\'').trim_matches('"');
                if cleaned.len() == 36 && cleaned.matches('-').count() == 4
                    || cleaned.parse::<i64>().is_ok()
                {
                    Some(cleaned.to_string())
                } else {
                    None
                }
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Extension trait to add business error conversion to `DbErr`
pub trait DbErrorExt {
    fn to_business_error(self, context: &str) -> BusinessError;
}

impl DbErrorExt for DbErr {
    fn to_business_error(self, context: &str) -> BusinessError {
        ErrorMapper::map_db_error(self, context)
    }
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;
