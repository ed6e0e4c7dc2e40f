pub mod amass;
pub mod assetfinder;
pub mod portscan_intensive;
pub mod portscan_quick;
pub mod registry;
pub mod subfinder;
pub mod types;
