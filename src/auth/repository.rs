//! Directory contracts
//!
//! Lookups the file service consults before touching storage. Deployments
//! supply their own implementations; `StaticDirectory` is the in-memory one.

use std::collections::HashSet;

use super::privilege::Privilege;

pub trait UserRepository: Send + Sync {
    fn is_found(&self, user: &str) -> bool;
}

pub trait ApplicationRepository: Send + Sync {
    fn is_found(&self, application: &str) -> bool;

    fn is_perimeter_found(&self, application: &str, perimeter: &str) -> bool;
}

pub trait UserRightRepository: Send + Sync {
    fn get_privileges(&self, user: &str, application: &str, perimeter: &str) -> HashSet<Privilege>;

    /// True when any held privilege grants `required`.
    fn is_authorized(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        required: Privilege,
    ) -> bool {
        self.get_privileges(user, application, perimeter)
            .iter()
            .any(|held| held.grants(required))
    }
}
