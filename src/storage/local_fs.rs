use super::*;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const MAX_NAME_ATTEMPTS: u64 = 16;

/// Flat directory of uploaded files. The directory listing is the only index.
pub struct LocalFileStorage {
    storage_path: PathBuf,
    naming: NamingScheme,
    clock: StampClock,
}

impl LocalFileStorage {
    pub fn new(storage_path: PathBuf, naming: NamingScheme) -> Result<Self, StorageError> {
        if !storage_path.exists() {
            std::fs::create_dir_all(&storage_path)?;
        }
        Ok(Self {
            storage_path,
            naming,
            clock: StampClock::default(),
        })
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        if !is_plain_name(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.storage_path.join(name))
    }
}

#[async_trait]
impl Storage for LocalFileStorage {
    async fn save(&self, file_data: FileData) -> Result<String, StorageError> {
        let extension = extension_of(&file_data.filename);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            // Stems never repeat in-process, so a clash means a file put there
            // by someone else.
            let name = format!("{}{}", self.naming.stem(&self.clock), extension);
            let file_path = self.storage_path.join(&name);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&file_path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(name = %name, attempt, "Generated name taken, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            file.write_all(&file_data.bytes).await?;
            file.flush().await?;
            return Ok(name);
        }

        Err(StorageError::NameExhausted(MAX_NAME_ATTEMPTS))
    }

    async fn get(&self, name: &str) -> Result<StoredFile, StorageError> {
        let file_path = self.resolve(name)?;

        let meta = match fs::metadata(&file_path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound),
            Err(e) => return Err(e.into()),
        };
        if !meta.is_file() {
            return Err(StorageError::NotFound);
        }

        let bytes = fs::read(&file_path).await?;
        let content_type = mime_guess::from_path(&file_path).first_or_octet_stream();

        Ok(StoredFile {
            bytes,
            content_type,
        })
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = fs::read_dir(&self.storage_path).await?;

        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // Names that are not valid UTF-8 cannot be turned into URLs.
            if let Ok(name) = entry.file_name().into_string() {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    fn root(&self) -> &Path {
        &self.storage_path
    }
}
