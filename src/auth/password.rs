use super::AuthError;

/// bcrypt hash computed on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(valid)
}
