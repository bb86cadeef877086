//! Access validator
//!
//! Implements the fail-fast validation chain run before every file service
//! operation: user, application, perimeter, authorization, then folder and
//! file existence. Each step has its own error kind and nothing is written
//! before the last step passes.

use log::warn;
use std::sync::Arc;

use super::privilege::Privilege;
use super::repository::{ApplicationRepository, UserRepository, UserRightRepository};
use crate::error::ServiceError;
use crate::model::{File, Folder};
use crate::storage::FileRepository;

pub struct AccessValidator {
    users: Arc<dyn UserRepository>,
    applications: Arc<dyn ApplicationRepository>,
    rights: Arc<dyn UserRightRepository>,
    files: Arc<dyn FileRepository>,
}

impl AccessValidator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        applications: Arc<dyn ApplicationRepository>,
        rights: Arc<dyn UserRightRepository>,
        files: Arc<dyn FileRepository>,
    ) -> Self {
        Self {
            users,
            applications,
            rights,
            files,
        }
    }

    /// Steps 1 to 4: identity, scope and authorization.
    pub fn check_access(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        privilege: Privilege,
    ) -> Result<(), ServiceError> {
        self.assert_user_found(user)?;
        self.assert_application_found(application)?;
        self.assert_perimeter_found(application, perimeter)?;
        self.assert_user_is_authorized(user, application, perimeter, privilege)
    }

    pub fn assert_user_found(&self, user: &str) -> Result<(), ServiceError> {
        if self.users.is_found(user) {
            Ok(())
        } else {
            warn!("Rejected unknown user '{user}'");
            Err(ServiceError::UserNotFound {
                user: user.to_string(),
            })
        }
    }

    pub fn assert_application_found(&self, application: &str) -> Result<(), ServiceError> {
        if self.applications.is_found(application) {
            Ok(())
        } else {
            warn!("Rejected unknown application '{application}'");
            Err(ServiceError::ApplicationNotFound {
                application: application.to_string(),
            })
        }
    }

    pub fn assert_perimeter_found(
        &self,
        application: &str,
        perimeter: &str,
    ) -> Result<(), ServiceError> {
        if self.applications.is_perimeter_found(application, perimeter) {
            Ok(())
        } else {
            warn!("Rejected unknown perimeter '{perimeter}' for application '{application}'");
            Err(ServiceError::PerimeterNotFound {
                application: application.to_string(),
                perimeter: perimeter.to_string(),
            })
        }
    }

    pub fn assert_user_is_authorized(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        privilege: Privilege,
    ) -> Result<(), ServiceError> {
        if self
            .rights
            .is_authorized(user, application, perimeter, privilege)
        {
            Ok(())
        } else {
            warn!(
                "User '{user}' denied {} access on {application}/{perimeter}",
                privilege.action()
            );
            Err(ServiceError::Unauthorized {
                user: user.to_string(),
                application: application.to_string(),
                perimeter: perimeter.to_string(),
                privilege,
            })
        }
    }

    pub fn assert_folder_found(
        &self,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<(), ServiceError> {
        if self.files.is_folder_found(application, perimeter, folder)? {
            Ok(())
        } else {
            Err(ServiceError::FolderNotFound {
                application: application.to_string(),
                perimeter: perimeter.to_string(),
                folder: folder.clone(),
            })
        }
    }

    pub fn assert_file_found(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<(), ServiceError> {
        if self.files.is_file_found(application, perimeter, file)? {
            Ok(())
        } else {
            Err(ServiceError::FileNotFound {
                application: application.to_string(),
                perimeter: perimeter.to_string(),
                file: file.clone(),
            })
        }
    }

    pub fn assert_file_not_found(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<(), ServiceError> {
        if self.files.is_file_found(application, perimeter, file)? {
            Err(ServiceError::FileFound {
                application: application.to_string(),
                perimeter: perimeter.to_string(),
                file: file.clone(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticDirectory;
    use crate::storage::InMemoryFileRepository;

    fn validator() -> (AccessValidator, Arc<InMemoryFileRepository>) {
        let directory = Arc::new(StaticDirectory::new());
        directory.add_user("alice");
        directory.add_user("bob");
        directory.add_perimeter("billing", "emea");
        directory.grant("alice", "billing", "emea", Privilege::Write);
        directory.grant("bob", "billing", "emea", Privilege::Read);

        let files = Arc::new(InMemoryFileRepository::new());
        let validator = AccessValidator::new(
            directory.clone(),
            directory.clone(),
            directory,
            files.clone(),
        );
        (validator, files)
    }

    #[test]
    fn test_chain_reports_first_failing_step() {
        let (validator, _) = validator();

        let err = validator
            .check_access("mallory", "nope", "nope", Privilege::Read)
            .unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound { .. }));

        let err = validator
            .check_access("alice", "nope", "nope", Privilege::Read)
            .unwrap_err();
        assert!(matches!(err, ServiceError::ApplicationNotFound { .. }));

        let err = validator
            .check_access("alice", "billing", "apac", Privilege::Read)
            .unwrap_err();
        assert!(matches!(err, ServiceError::PerimeterNotFound { .. }));

        let err = validator
            .check_access("bob", "billing", "emea", Privilege::Write)
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Unauthorized {
                privilege: Privilege::Write,
                ..
            }
        ));

        assert!(validator.check_access("bob", "billing", "emea", Privilege::Read).is_ok());
        assert!(validator.check_access("alice", "billing", "emea", Privilege::Write).is_ok());
    }

    #[test]
    fn test_existence_checks() {
        let (validator, files) = validator();
        let folder = Folder::parse("docs");
        let file = File::new(folder.clone(), "a.txt");

        assert!(matches!(
            validator.assert_folder_found("billing", "emea", &folder),
            Err(ServiceError::FolderNotFound { .. })
        ));

        files.add_folder("billing", "emea", folder.clone());
        assert!(validator.assert_folder_found("billing", "emea", &folder).is_ok());
        assert!(matches!(
            validator.assert_file_found("billing", "emea", &file),
            Err(ServiceError::FileNotFound { .. })
        ));
        assert!(validator.assert_file_not_found("billing", "emea", &file).is_ok());

        files.write("billing", "emea", &file, b"x").unwrap();
        assert!(validator.assert_file_found("billing", "emea", &file).is_ok());
        assert!(matches!(
            validator.assert_file_not_found("billing", "emea", &file),
            Err(ServiceError::FileFound { .. })
        ));
    }
}
