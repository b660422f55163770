// src/db/slot.rs

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

// ---
// A "porta" de persistência: um slot chave-valor de texto.
// ---
// Qualquer ambiente (arquivo, banco embutido, localStorage) entra aqui sem
// mudar a lógica do serviço.
pub trait KeyValueSlot: Send + Sync {
    /// `Ok(None)` quando a chave nunca foi gravada.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Substitui o valor inteiro da chave.
    fn write(&self, key: &str, value: &str) -> io::Result<()>;
}

// --- Slot em arquivo: `<dir>/<key>.json` ---
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueSlot for FileSlot {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Grava num temporário e renomeia: um término abrupto nunca deixa
        // o snapshot pela metade.
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let written = fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(value.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &target));

        // Falhou no meio: não deixa o temporário para trás
        if written.is_err() && tmp.is_file() {
            if let Err(e) = fs::remove_file(&tmp) {
                tracing::warn!("não foi possível remover {}: {}", tmp.display(), e);
            }
        }
        written
    }
}

// --- Slot em memória ---
// Usado nos testes e quando não há diretório de dados.
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot já contendo `value` em `key`.
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let slot = Self::default();
        if let Ok(mut entries) = slot.entries.lock() {
            entries.insert(key.to_string(), value.into());
        }
        slot
    }

    /// Simula armazenamento indisponível (cota excedida, disco removido).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> io::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(io::Error::other("armazenamento indisponível"));
        }
        Ok(())
    }

    fn poisoned() -> io::Error {
        io::Error::other("slot em memória envenenado")
    }
}

impl KeyValueSlot for MemorySlot {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        self.check_available()?;
        let entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.check_available()?;
        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// Permite compartilhar o mesmo slot entre o serviço e quem o inspeciona.
impl<S: KeyValueSlot + ?Sized> KeyValueSlot for std::sync::Arc<S> {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).write(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_slot_missing_key_reads_none() {
        let dir = tempdir().expect("tempdir");
        let slot = FileSlot::new(dir.path());
        assert_eq!(slot.read("products").unwrap(), None);
    }

    #[test]
    fn file_slot_write_replaces_value_and_creates_dir() {
        let dir = tempdir().expect("tempdir");
        let slot = FileSlot::new(dir.path().join("nested"));

        slot.write("products", "[1]").unwrap();
        slot.write("products", "[2]").unwrap();

        assert_eq!(slot.read("products").unwrap().as_deref(), Some("[2]"));
        assert!(dir.path().join("nested/products.json").exists());
        assert!(!dir.path().join("nested/.products.json.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = tempdir().expect("tempdir");
        // Um diretório não vazio no lugar do arquivo: o rename falha
        let target = dir.path().join("products.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let slot = FileSlot::new(dir.path());
        assert!(slot.write("products", "[1]").is_err());
        assert!(!dir.path().join(".products.json.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn memory_slot_can_be_made_unavailable() {
        let slot = MemorySlot::with_entry("products", "[]");
        slot.set_unavailable(true);
        assert!(slot.write("products", "[1]").is_err());
        assert!(slot.read("products").is_err());

        slot.set_unavailable(false);
        assert_eq!(slot.read("products").unwrap().as_deref(), Some("[]"));
    }
}
