use anyhow::anyhow;
use secrecy::SecretString;
use std::{
    env,
    fs::{metadata, File},
    io::Read,
};

/// Loads the oracle credential, preferring `file_path` when it exists and
/// falling back to the `env_var` environment variable.
pub fn get_api_key(file_path: Option<&str>, env_var: &str) -> Result<SecretString, anyhow::Error> {
    if let Some(path) = file_path.filter(|path| metadata(path).is_ok()) {
        return read_key(path);
    }

    match env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_owned())),
        _ => Err(anyhow!(
            "No oracle api key found: set {} or provide a key file",
            env_var
        )),
    }
}

fn read_key(file_path: &str) -> Result<SecretString, anyhow::Error> {
    let mut file = File::open(file_path)?;
    let mut key = String::new();
    file.read_to_string(&mut key)?;

    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Key file {} is empty", file_path));
    }
    Ok(SecretString::from(key.to_owned()))
}
