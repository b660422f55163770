// src/handlers/scanner.rs

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::common::error::AppError;

/// Colaborador externo que captura um código (câmera, leitor USB...).
///
/// Produz zero ou um código lido, ou `AppError::ScannerUnavailable` quando
/// não há acesso ao dispositivo. O resultado só preenche o campo `code` do
/// formulário; o serviço não sabe de onde ele veio.
#[async_trait]
pub trait CodeScanner: Send {
    async fn scan(&mut self) -> Result<Option<String>, AppError>;
}

// Leitores "keyboard wedge" digitam o código e um Enter: uma linha por leitura.
pub struct LineScanner<R> {
    reader: R,
}

impl<R> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl LineScanner<tokio::io::BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> CodeScanner for LineScanner<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn scan(&mut self) -> Result<Option<String>, AppError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| AppError::ScannerUnavailable(e.to_string()))?;

        // EOF ou linha em branco: nada foi lido
        let code = line.trim();
        if read == 0 || code.is_empty() {
            tracing::debug!("leitura de código cancelada");
            return Ok(None);
        }
        tracing::debug!(%code, "código lido");
        Ok(Some(code.to_string()))
    }
}
