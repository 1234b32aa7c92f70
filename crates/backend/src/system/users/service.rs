use anyhow::Result;
use chrono::Utc;
use contracts::system::auth::{RegisterRequest, UserInfo};
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};

use super::repository;
use crate::system::auth::password;

fn validate_email(email: &Option<String>) -> Result<()> {
    if let Some(email) = email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(anyhow::anyhow!("Некорректный адрес электронной почты"));
        }
    }
    Ok(())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Create a new user
pub async fn create(dto: CreateUserDto, created_by: Option<String>) -> Result<String> {
    let username = dto.username.trim().to_string();
    if username.is_empty() {
        return Err(anyhow::anyhow!("Имя пользователя не может быть пустым"));
    }

    if repository::get_by_username(&username).await?.is_some() {
        return Err(anyhow::anyhow!("Пользователь с таким именем уже существует"));
    }

    validate_email(&dto.email)?;
    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username,
        email: normalize_optional(dto.email),
        full_name: normalize_optional(dto.full_name),
        is_active: true,
        is_admin: dto.is_admin,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(&user, &password_hash).await?;
    tracing::info!("User {} created ({})", user.username, user_id);

    Ok(user_id)
}

/// Self-registration: never grants admin rights
pub async fn register(request: RegisterRequest) -> Result<User> {
    let id = create(
        CreateUserDto {
            username: request.username,
            password: request.password,
            email: request.email,
            full_name: request.full_name,
            is_admin: false,
        },
        None,
    )
    .await?;
    repository::get_by_id(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User {} disappeared after insert", id))
}

pub async fn update(dto: UpdateUserDto) -> Result<()> {
    let mut user = repository::get_by_id(&dto.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Пользователь не найден"))?;

    validate_email(&dto.email)?;

    user.email = normalize_optional(dto.email);
    user.full_name = normalize_optional(dto.full_name);
    user.is_active = dto.is_active;
    user.is_admin = dto.is_admin;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await
}

pub async fn delete(id: &str) -> Result<bool> {
    repository::delete(id).await
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Verify user credentials (for login). Inactive users are treated as unknown.
pub async fn verify_credentials(username: &str, password: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username.trim()).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        tracing::warn!("Login attempt for inactive user {}", user.username);
        return Ok(None);
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for {}: {:#}", user.id, e);
    }

    Ok(Some(user))
}

pub fn to_user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        email: user.email,
        is_admin: user.is_admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email(&None).is_ok());
        assert!(validate_email(&Some("".into())).is_ok());
        assert!(validate_email(&Some("a@b.ru".into())).is_ok());
        assert!(validate_email(&Some("nope".into())).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" Иван ".into())), Some("Иван".into()));
    }
}
