pub mod confcmd;
pub mod fetch;
pub mod poller;
pub mod status;
pub mod url_utils;
