//! [`File`]-backed [`Storage`] implementation.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracerr::Traced;

use super::{Error, Persisted, Storage};

/// [`Storage`] keeping tokens in a JSON file.
#[derive(Clone, Debug)]
pub struct File {
    /// Path of the file.
    path: PathBuf,
}

impl File {
    /// Creates a new [`File`] [`Storage`] at the provided `path`.
    ///
    /// The file itself is created lazily, on the first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns path of this [`File`].
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for File {
    fn load(&self) -> Result<Option<Persisted>, Traced<Error>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(tracerr::new!(Error::from(e))),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }

    fn save(&self, tokens: &Persisted) -> Result<(), Traced<Error>> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty())
        {
            fs::create_dir_all(dir).map_err(tracerr::from_and_wrap!(=> Error))?;
        }
        let bytes = serde_json::to_vec_pretty(tokens)
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        fs::write(&self.path, bytes).map_err(tracerr::from_and_wrap!(=> Error))
    }

    fn clear(&self) -> Result<(), Traced<Error>> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(tracerr::new!(Error::from(e))),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::fs;

    use super::{File, Persisted, Storage as _};

    fn tokens() -> Persisted {
        Persisted {
            access_token: Some("access".into()),
            refresh_token: Some("refresh".into()),
        }
    }

    #[test]
    fn loads_nothing_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = File::new(dir.path().join("session.json"));

        assert_eq!(storage.load().unwrap(), None);
        storage.clear().unwrap();
    }

    #[test]
    fn saves_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let storage = File::new(dir.path().join("nested/session.json"));

        storage.save(&tokens()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(tokens()));

        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(storage.path()).unwrap()).unwrap();
        assert_eq!(json["access_token"], "access");
        assert_eq!(json["refresh_token"], "refresh");

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn tolerates_partial_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let storage = File::new(dir.path().join("session.json"));
        fs::write(storage.path(), r#"{"access_token": "access"}"#).unwrap();

        assert_eq!(
            storage.load().unwrap(),
            Some(Persisted {
                access_token: Some("access".into()),
                refresh_token: None,
            }),
        );
    }

    #[test]
    fn fails_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = File::new(dir.path().join("session.json"));
        fs::write(storage.path(), "not json").unwrap();

        assert!(storage.load().is_err());
    }
}
