use actix_web::error::{ErrorForbidden, ErrorUnauthorized};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::model::Role;

pub const USER_HEADER: &str = "X-User";
pub const ROLE_HEADER: &str = "X-Role";
/// Width of the `username` columns.
pub const MAX_USERNAME_LEN: usize = 191;

/// The caller as identified by the upstream gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub username: String,
    pub role: Role,
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl FromRequest for Actor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let username = match header(req, USER_HEADER) {
            Some(u) if u.chars().count() > MAX_USERNAME_LEN => {
                return ready(Err(ErrorUnauthorized("Invalid X-User header")));
            }
            Some(u) => u.to_string(),
            None => return ready(Err(ErrorUnauthorized("Missing X-User header"))),
        };

        let role = match header(req, ROLE_HEADER).map(str::parse::<Role>) {
            Some(Ok(r)) => r,
            Some(Err(_)) => return ready(Err(ErrorUnauthorized("Invalid role"))),
            None => return ready(Err(ErrorUnauthorized("Missing X-Role header"))),
        };

        ready(Ok(Actor { username, role }))
    }
}

impl Actor {
    pub fn require_manager(&self) -> actix_web::Result<()> {
        if self.role == Role::Manager {
            Ok(())
        } else {
            Err(ErrorForbidden("Manager only"))
        }
    }

    pub fn require_employee(&self) -> actix_web::Result<()> {
        if self.role == Role::Employee {
            Ok(())
        } else {
            Err(ErrorForbidden("Employee only"))
        }
    }
}
