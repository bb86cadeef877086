//! Static directory
//!
//! In-memory user, application and rights directory. Seeded from
//! configuration or built programmatically; safe to share across threads.

use log::debug;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

use super::privilege::Privilege;
use super::repository::{ApplicationRepository, UserRepository, UserRightRepository};
use crate::config::DirectoryConfig;

type RightKey = (String, String, String);

#[derive(Default)]
pub struct StaticDirectory {
    users: RwLock<HashSet<String>>,
    applications: RwLock<HashMap<String, HashSet<String>>>,
    rights: RwLock<HashMap<RightKey, HashSet<Privilege>>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from the `[directory]` configuration section.
    pub fn from_config(config: &DirectoryConfig) -> Self {
        let directory = Self::new();
        for user in &config.users {
            directory.add_user(user);
        }
        for application in &config.applications {
            directory.add_application(&application.name);
            for perimeter in &application.perimeters {
                directory.add_perimeter(&application.name, perimeter);
            }
        }
        for right in &config.rights {
            for privilege in &right.privileges {
                directory.grant(&right.user, &right.application, &right.perimeter, *privilege);
            }
        }

        debug!(
            "Loaded directory: {} users, {} applications, {} right entries",
            config.users.len(),
            config.applications.len(),
            config.rights.len()
        );
        directory
    }

    pub fn add_user(&self, user: &str) {
        self.users.write().insert(user.to_string());
    }

    pub fn add_application(&self, application: &str) {
        self.applications
            .write()
            .entry(application.to_string())
            .or_default();
    }

    /// Registers a perimeter, creating the application if needed.
    pub fn add_perimeter(&self, application: &str, perimeter: &str) {
        self.applications
            .write()
            .entry(application.to_string())
            .or_default()
            .insert(perimeter.to_string());
    }

    pub fn grant(&self, user: &str, application: &str, perimeter: &str, privilege: Privilege) {
        self.rights
            .write()
            .entry((user.to_string(), application.to_string(), perimeter.to_string()))
            .or_default()
            .insert(privilege);
    }

    /// Removes every privilege the user holds on the perimeter.
    pub fn revoke(&self, user: &str, application: &str, perimeter: &str) {
        self.rights
            .write()
            .remove(&(user.to_string(), application.to_string(), perimeter.to_string()));
    }
}

impl UserRepository for StaticDirectory {
    fn is_found(&self, user: &str) -> bool {
        self.users.read().contains(user)
    }
}

impl ApplicationRepository for StaticDirectory {
    fn is_found(&self, application: &str) -> bool {
        self.applications.read().contains_key(application)
    }

    fn is_perimeter_found(&self, application: &str, perimeter: &str) -> bool {
        self.applications
            .read()
            .get(application)
            .is_some_and(|perimeters| perimeters.contains(perimeter))
    }
}

impl UserRightRepository for StaticDirectory {
    fn get_privileges(&self, user: &str, application: &str, perimeter: &str) -> HashSet<Privilege> {
        self.rights
            .read()
            .get(&(user.to_string(), application.to_string(), perimeter.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
