use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. The timeout of the first call sticks.
pub fn http_client(timeout: Duration) -> Result<&'static Client, reqwest::Error> {
    CLIENT.get_or_try_init(|| Client::builder().timeout(timeout).build())
}
