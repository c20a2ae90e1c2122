use std::path::Path;
use url::Url;

mod parser;

pub mod error;
pub mod namespaces;
pub mod types;
pub mod xml;

pub use error::Error;
pub use parser::Definition;

/// Extracts a definition from an in-memory WSDL document.
pub fn from_bytes(bytes: &[u8]) -> Result<Definition, Error> {
    Definition::parse(bytes)
}

pub fn from_str(text: &str) -> Result<Definition, Error> {
    Definition::parse(text.as_bytes())
}

/// Loads and extracts a WSDL document from a URL or a local path.
pub fn parse<S: AsRef<str>>(url: S) -> Result<Definition, Error> {
    let url = {
        match Url::parse(url.as_ref()) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let path = Path::new(url.as_ref())
                    .canonicalize()
                    .map_err(|err| Error::PathConversionError(Some(err)))?;

                Url::from_file_path(&path).map_err(|()| Error::PathConversionError(None))?
            }
            Err(err) => return Err(err.into()),
        }
    };

    let bytes = fetch(&url)?;
    tracing::debug!(%url, bytes = bytes.len(), "loaded wsdl document");

    from_bytes(&bytes)
}

fn fetch(url: &Url) -> Result<Vec<u8>, Error> {
    match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| Error::PathConversionError(None))?;

            Ok(std::fs::read(path)?)
        }

        "http" | "https" => {
            let response = reqwest::blocking::get(url.clone())?.error_for_status()?;
            Ok(response.bytes()?.to_vec())
        }

        other => Err(Error::UnsupportedScheme(other.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_scheme() {
        assert!(matches!(
            parse("ftp://example.com/service.wsdl"),
            Err(Error::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[test]
    fn missing_path_is_a_conversion_error() {
        assert!(matches!(
            parse("does/not/exist.wsdl"),
            Err(Error::PathConversionError(Some(_)))
        ));
    }
}
