pub mod registry_api;
