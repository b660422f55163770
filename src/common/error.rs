use thiserror::Error;
use uuid::Uuid;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Nenhuma variante é fatal: o serviço continua operando em memória.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(Uuid),

    // Slot de armazenamento indisponível (disco cheio, permissão, etc.)
    #[error("Erro de persistência: {0}")]
    PersistenceError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Leitor de código indisponível: {0}")]
    ScannerUnavailable(String),
}

impl AppError {
    /// Mensagem curta para mostrar ao usuário (o "toast" da interface).
    pub fn user_message(&self) -> String {
        match self {
            // Junta as mensagens de cada campo, na ordem em que o formulário as mostra.
            AppError::ValidationError(errors) => {
                let field_errors = errors.field_errors();
                let mut messages = Vec::new();
                for field in ["code", "name", "department"] {
                    if let Some(list) = field_errors.get(field) {
                        messages.extend(
                            list.iter()
                                .filter_map(|e| e.message.as_ref().map(|m| m.to_string())),
                        );
                    }
                }
                if messages.is_empty() {
                    "Um ou mais campos são inválidos.".to_string()
                } else {
                    messages.join("; ")
                }
            }
            AppError::ProductNotFound(_) => "Produto não encontrado.".to_string(),
            AppError::PersistenceError(_) | AppError::SerializationError(_) => {
                "Não foi possível salvar os produtos. As alterações ficam apenas em memória.".to_string()
            }
            AppError::ScannerUnavailable(reason) => {
                format!("Não foi possível acessar o leitor de código: {}", reason)
            }
        }
    }
}
