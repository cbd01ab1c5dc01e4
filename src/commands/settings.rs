use crate::client::Aria2Client;
use crate::rpc::Transport;
use crate::Result;
use std::collections::BTreeMap;

/// Global options as pretty-printed JSON.
pub async fn show_config<T: Transport>(client: &Aria2Client<T>) -> Result<Vec<String>> {
    let options = client.get_global_option().await?;
    Ok(vec![serde_json::to_string_pretty(&options)?])
}

pub async fn set_config<T: Transport>(
    client: &Aria2Client<T>,
    key: &str,
    value: &str,
) -> Result<Vec<String>> {
    let mut change = BTreeMap::new();
    change.insert(key.to_string(), value.to_string());
    client.change_global_option(&change).await?;
    Ok(Vec::new())
}
