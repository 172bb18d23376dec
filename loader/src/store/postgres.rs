//! PostgreSQL module store backed by PL/Java's `sqlj` schema.
//!
//! One [`PgModuleStore`] owns one connection for the whole run. Calls are
//! autocommitted; dropping the store closes the session.

use super::{ModuleStore, StoreError};
use crate::config::DatabaseConfig;
use crate::module_name::ModuleName;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Bool, Bytea, Text};
use log::{debug, info};
use url::Url;

const REMOVE_SQL: &str = "SELECT sqlj.remove_jar($1, $2)";
const INSTALL_SQL: &str = "SELECT sqlj.install_jar($1, $2, $3)";

/// A single PostgreSQL session used for every remove and install call.
pub struct PgModuleStore {
    connection: PgConnection,
    target: String,
}

impl PgModuleStore {
    /// Open the session described by `settings`.
    ///
    /// Credentials from the settings are merged into the URL; the password
    /// never appears in log output or errors.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid or the
    /// server cannot be reached.
    pub fn connect(settings: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = connection_url(settings)?;
        let target = redacted(&url);
        info!("connecting to {target}");

        let connection =
            PgConnection::establish(url.as_str()).map_err(|err| StoreError::Connection {
                message: format!("cannot connect to {target}: {err}"),
            })?;
        Ok(Self { connection, target })
    }

    /// Redacted URL of the session's server.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl ModuleStore for PgModuleStore {
    fn remove(&mut self, name: &ModuleName, cascade: bool) -> Result<(), StoreError> {
        diesel::sql_query(REMOVE_SQL)
            .bind::<Text, _>(name.as_str())
            .bind::<Bool, _>(cascade)
            .execute(&mut self.connection)
            .map(|_| ())
            .map_err(|err| classify("remove", name, err))
    }

    fn install(
        &mut self,
        payload: &[u8],
        name: &ModuleName,
        replace: bool,
    ) -> Result<bool, StoreError> {
        let rows = diesel::sql_query(INSTALL_SQL)
            .bind::<Bytea, _>(payload)
            .bind::<Text, _>(name.as_str())
            .bind::<Bool, _>(replace)
            .execute(&mut self.connection)
            .map_err(|err| classify("install", name, err))?;
        Ok(rows > 0)
    }
}

impl Drop for PgModuleStore {
    fn drop(&mut self) {
        debug!("closing session to {}", self.target);
    }
}

/// The URL `settings` describe, with any password masked.
///
/// # Errors
///
/// Returns [`StoreError::Connection`] if the URL is invalid.
pub fn redacted_target(settings: &DatabaseConfig) -> Result<String, StoreError> {
    connection_url(settings).map(|url| redacted(&url))
}

/// Merge the configured credentials into the connection URL.
fn connection_url(settings: &DatabaseConfig) -> Result<Url, StoreError> {
    let invalid = |reason: &str| StoreError::Connection {
        message: format!("invalid database url: {reason}"),
    };

    let mut url = Url::parse(&settings.url).map_err(|err| invalid(&err.to_string()))?;
    if let Some(username) = settings.username.as_deref() {
        url.set_username(username)
            .map_err(|()| invalid("url cannot carry a username"))?;
    }
    if let Some(password) = settings.password.as_deref() {
        url.set_password(Some(password))
            .map_err(|()| invalid("url cannot carry a password"))?;
    }
    Ok(url)
}

/// Render `url` with any password masked.
fn redacted(url: &Url) -> String {
    if url.password().is_none() {
        return url.to_string();
    }
    let mut masked = url.clone();
    if masked.set_password(Some("****")).is_err() {
        return format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    }
    masked.to_string()
}

/// Split diesel errors into call rejections and session failures.
fn classify(operation: &'static str, name: &ModuleName, err: DieselError) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            StoreError::Connection {
                message: info.message().to_owned(),
            }
        }
        DieselError::DatabaseError(_, info) => StoreError::Rejected {
            operation,
            name: name.clone(),
            message: info.message().to_owned(),
        },
        other => StoreError::Connection {
            message: format!("{operation} of {name} failed: {other}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(url: &str, username: Option<&str>, password: Option<&str>) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_owned(),
            username: username.map(str::to_owned),
            password: password.map(str::to_owned),
        }
    }

    #[test]
    fn credentials_are_merged_into_url() {
        let url = connection_url(&settings(
            "postgres://db.example:5432/app",
            Some("loader"),
            Some("s3cret"),
        ))
        .expect("valid url");

        assert_eq!(url.username(), "loader");
        assert_eq!(url.password(), Some("s3cret"));
        assert_eq!(url.path(), "/app");
    }

    #[test]
    fn special_characters_in_password_are_encoded() {
        let url = connection_url(&settings("postgres://db/app", Some("u"), Some("p@ss:word")))
            .expect("valid url");

        assert!(!url.as_str().contains("p@ss:word"));
    }

    #[test]
    fn url_without_credentials_is_unchanged() {
        let url = connection_url(&settings("postgres://db/app", None, None)).expect("valid url");
        assert_eq!(url.as_str(), "postgres://db/app");
    }

    #[test]
    fn invalid_url_is_a_connection_error() {
        let err = connection_url(&settings("not a url", None, None)).expect_err("invalid url");
        assert!(err.is_infrastructure());
    }

    #[test]
    fn redaction_masks_password() {
        let url = connection_url(&settings("postgres://db/app", Some("u"), Some("s3cret")))
            .expect("valid url");

        let shown = redacted(&url);

        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("u:****@db"));
    }

    #[test]
    fn redacted_target_hides_password() {
        let shown = redacted_target(&settings("postgres://db/app", Some("u"), Some("s3cret")))
            .expect("valid url");
        assert_eq!(shown, "postgres://u:****@db/app");
    }

    #[rstest]
    #[case::missing_jar(DatabaseErrorKind::Unknown, false)]
    #[case::constraint(DatabaseErrorKind::UniqueViolation, false)]
    #[case::closed(DatabaseErrorKind::ClosedConnection, true)]
    fn database_errors_are_classified(
        #[case] kind: DatabaseErrorKind,
        #[case] infrastructure: bool,
    ) {
        let err =
            DieselError::DatabaseError(kind, Box::new("jar core_lib_2_3_1 not found".to_owned()));

        let classified = classify("remove", &ModuleName::from("core_lib_2_3_1"), err);

        assert_eq!(classified.is_infrastructure(), infrastructure);
    }

    #[test]
    fn non_database_errors_are_connection_failures() {
        let classified = classify(
            "install",
            &ModuleName::from("core_lib_2_3_1"),
            DieselError::BrokenTransactionManager,
        );

        assert!(classified.is_infrastructure());
    }
}
