//! Provider API endpoint groups.

mod instances;
mod static_ips;

pub use instances::InstanceApi;
pub use static_ips::StaticIpApi;
