mod pip;
pub(crate) mod toml;

pub use pip::parse_pip_conf;
