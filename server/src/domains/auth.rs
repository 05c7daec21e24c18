//! # `/auth`: Authentication
//!
//! Endpoints to sign in and sign up in the server.

use axum::{
    debug_handler,
    extract::{FromRef, State},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait as _, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter as _, Set,
};

use bolao_server_auth::{
    check_password, hash_password, new_token, AuthKey, PasswordError, SecurityAddon,
};
use bolao_server_dtos::user::{
    SigninError, SignupError, UserSigninDto, UserSigninResponseDto, UserSignupDto,
    UserSignupResponseDto,
};
use bolao_server_entities::{
    prelude::*,
    user::{self, UserId},
};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

#[utoipa::path(
    post, path = "/signup",
    request_body=UserSignupDto,
    responses(UserSignupResponseDto, SignupError)
)]
#[debug_handler(state = crate::app::AppState)]
/// Create a new user
///
/// Provide the server with the authentication info, and get an access token in return (along with user info).
async fn signup(
    State(auth_key): State<AuthKey>,
    State(db): State<DatabaseConnection>,
    UserSignupDto {
        name,
        password,
        avatar_url,
    }: UserSignupDto,
) -> Result<UserSignupResponseDto, SignupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SignupError::BlankUsername);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(SignupError::WhitespacesInUsername);
    }

    let id = UserId::gen();
    let (auth_id, password) = hash_password(id, &password).map_err(|err| {
        tracing::error!("Cannot hash the password: {err}");
        SignupError::InternalServerError
    })?;

    let user = user::ActiveModel {
        id: Set(id.into()),
        name: Set(name.to_owned()),
        password: Set(password),
        avatar_url: Set(avatar_url),
        created_at: NotSet,
    };

    let user = match user.insert(&db).await {
        Ok(inserted) => inserted,
        Err(err) => {
            // check if it's a collision
            if User::find()
                .filter(user::Column::Name.eq(name))
                .count(&db)
                .await?
                == 1
            {
                return Err(SignupError::UserAlreadyExist);
            }
            return Err(err.into());
        }
    };

    let token = new_token(auth_id, &auth_key).map_err(|err| {
        tracing::error!("Cannot create a token: {err}");
        SignupError::InternalServerError
    })?;

    Ok(UserSignupResponseDto(UserSigninResponseDto {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    post, path = "/signin",
    request_body=UserSigninDto,
    responses(UserSigninResponseDto, SigninError)
)]
#[debug_handler(state = crate::app::AppState)]
/// Signin into the server
///
/// Provide the server with the authentication info, and get an access token in return (along with user info).
async fn signin(
    State(auth_key): State<AuthKey>,
    State(db): State<DatabaseConnection>,
    UserSigninDto { name, password }: UserSigninDto,
) -> Result<UserSigninResponseDto, SigninError> {
    let Some(user) = User::find()
        .filter(user::Column::Name.eq(name.trim()))
        .one(&db)
        .await?
    else {
        return Err(SigninError::UserDoNotExist);
    };

    let auth_id =
        check_password(user.user_id(), &user.password, &password).map_err(|err| match err {
            PasswordError::Password => SigninError::WrongPassword,
            err => {
                tracing::error!("Cannot check the password: {err}");
                SigninError::InternalServerError
            }
        })?;

    let token = new_token(auth_id, &auth_key).map_err(|err| {
        tracing::error!("Cannot create a token: {err}");
        SigninError::InternalServerError
    })?;

    Ok(UserSigninResponseDto {
        token,
        user: user.into(),
    })
}

#[derive(OpenApi)]
#[openapi(modifiers(&SecurityAddon))]
struct ApiInfo;

pub(super) fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S>
where
    DatabaseConnection: FromRef<S>,
    AuthKey: FromRef<S>,
{
    let mut router = OpenApiRouter::with_openapi(ApiInfo::openapi())
        .routes(routes!(signup))
        .routes(routes!(signin));
    super::tag_api(router.get_openapi_mut(), "Auth");
    router
}
