pub mod domain;
pub mod nameserver;
pub mod record;
pub mod resolver;

pub use domain::Domain;
pub use nameserver::Nameserver;
