// ==========================================
// Proposal Desk - API layer error types
// ==========================================
// Responsibility: turn repository / importer failures into user-facing errors
// Every message states an explicit reason
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer errors
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // business rules
    // ==========================================
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Recurso não encontrado: {0}")]
    NotFound(String),

    #[error("Regra de negócio violada: {0}")]
    BusinessRuleViolation(String),

    #[error("Transição de estado inválida: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Nenhuma proposta válida para importar")]
    NothingToImport,

    // ==========================================
    // data access
    // ==========================================
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(String),

    #[error("Falha ao conectar ao banco: {0}")]
    DatabaseConnectionError(String),

    #[error("Falha na transação: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // import
    // ==========================================
    #[error("Falha na importação: {0}")]
    ImportError(String),

    // ==========================================
    // generic
    // ==========================================
    #[error("Erro interno: {0}")]
    InternalError(String),
}

// ==========================================
// From RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={}) não existe", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("lock do banco indisponível: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("violação de unicidade: {}", msg))
            }
            RepositoryError::DuplicateKey { namespace, key } => ApiError::BusinessRuleViolation(
                format!("registro duplicado em {}: {}", namespace, key),
            ),
            RepositoryError::SerializationError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::BusinessRuleViolation(msg) => ApiError::BusinessRuleViolation(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// From ImportError
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Proposal".to_string(),
            id: "P001".to_string(),
        };
        match ApiError::from(repo_err) {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Proposal"));
                assert!(msg.contains("P001"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let dup = RepositoryError::DuplicateKey {
            namespace: "proposals".to_string(),
            key: "EVENT-1-0".to_string(),
        };
        assert!(matches!(ApiError::from(dup), ApiError::BusinessRuleViolation(_)));
    }

    #[test]
    fn test_import_error_conversion() {
        let err = ApiError::from(ImportError::FileNotFound("x.xlsx".to_string()));
        match err {
            ApiError::ImportError(msg) => assert!(msg.contains("x.xlsx")),
            other => panic!("Expected ImportError, got {:?}", other),
        }
    }
}
