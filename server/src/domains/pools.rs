//! # `/pools`: Prediction pools
//!
//! Pools are created by anyone, and joined through their code. Participants
//! then guess the results of the games inside them.

use axum::{
    debug_handler,
    extract::{FromRef, State},
    http::StatusCode,
};
use futures::future::try_join_all;
use rand::{distributions::Alphanumeric, thread_rng, Rng as _};
use sea_orm::{
    prelude::Uuid, sea_query::Expr, sea_query::Query, ActiveModelTrait as _,
    ActiveValue::NotSet, ColumnTrait as _, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter as _, QueryOrder as _, QuerySelect as _, Set,
    TransactionTrait as _,
};
use utoipa::OpenApi as _;
use utoipa_axum::{router::OpenApiRouter, routes};

use bolao_server_auth::{Autenticated, AuthKey, UserClaimsRejection};
use bolao_server_dtos::{
    count::{CountDto, CountGetError},
    paginated::{PageInfo, PaginatedDto, PaginationParams},
    pool::{
        ParticipantPreviewDto, PoolCreateDto, PoolCreateError, PoolCreateResponseDto,
        PoolJoinDto, PoolJoinError, PoolListGetError, PoolQueryDto, PARTICIPANTS_PREVIEW_LEN,
    },
};
use bolao_server_entities::{
    participant::{self, ParticipantId},
    pool::{self, PoolId},
    prelude::*,
    user::{self, UserId},
};

mod single;

/// Length of the codes used to join the pools
const CODE_LEN: usize = 6;
/// Codes drawn before giving up on finding a free one
const CODE_ATTEMPTS: usize = 8;

/// Draw a random join code, made of uppercase letters and digits
fn generate_code() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LEN)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect()
}

/// Find the participation of a user into a pool
pub(super) async fn find_participant(
    db: &impl ConnectionTrait,
    pool: PoolId,
    user: UserId,
) -> Result<Option<participant::Model>, DbErr> {
    Participant::find()
        .filter(participant::Column::PoolId.eq(pool))
        .filter(participant::Column::UserId.eq(user))
        .one(db)
        .await
}

/// Collect the info shown about a pool
async fn pool_summary(
    db: &DatabaseConnection,
    pool: pool::Model,
    owner: Option<user::Model>,
) -> Result<PoolQueryDto, DbErr> {
    let participants = Participant::find().filter(participant::Column::PoolId.eq(pool.id));
    let (participants_count, preview) = tokio::try_join!(
        participants.clone().count(db),
        participants
            .find_also_related(User)
            .order_by_asc(participant::Column::JoinedAt)
            .limit(PARTICIPANTS_PREVIEW_LEN)
            .all(db)
    )?;
    let preview = preview
        .into_iter()
        .filter_map(|(participant, user)| {
            user.map(|user| ParticipantPreviewDto {
                id: participant.participant_id(),
                user_id: user.user_id(),
                name: user.name,
                avatar_url: user.avatar_url,
            })
        })
        .collect();
    Ok(PoolQueryDto::new(pool, owner, participants_count, preview))
}

#[utoipa::path(get, path = "/count", responses(CountDto, CountGetError))]
#[debug_handler(state = crate::app::AppState)]
/// Number of pools
///
/// Count the pools created on the server.
async fn pools_count(State(db): State<DatabaseConnection>) -> Result<CountDto, CountGetError> {
    let count = Pool::find().count(&db).await?;
    Ok(CountDto { count })
}

/// Insert a pool, and its owner as first participant
async fn insert_pool(
    db: &DatabaseConnection,
    title: &str,
    code: &str,
    owner: Option<UserId>,
) -> Result<PoolId, DbErr> {
    let pool_id = PoolId::gen();
    let pool = pool::ActiveModel {
        id: Set(pool_id.into()),
        title: Set(title.to_owned()),
        code: Set(code.to_owned()),
        owner_id: Set(owner.map(Uuid::from)),
        created_at: NotSet,
    };
    let participant = owner.map(|owner| participant::ActiveModel {
        id: Set(ParticipantId::gen().into()),
        pool_id: Set(pool_id.into()),
        user_id: Set(owner.into()),
        joined_at: NotSet,
    });

    db.transaction::<_, (), DbErr>(move |txn| {
        Box::pin(async move {
            pool.insert(txn).await?;
            if let Some(participant) = participant {
                participant.insert(txn).await?;
            }
            Ok(())
        })
    })
    .await
    .map_err(super::transaction_error)?;

    Ok(pool_id)
}

#[utoipa::path(
    post, path = "/",
    request_body = PoolCreateDto,
    responses(PoolCreateResponseDto, PoolCreateError),
    security((), ("user_token" = []))
)]
#[debug_handler(state = crate::app::AppState)]
/// Create a new pool
///
/// A unique code is generated for the pool, to be shared with who should join.
/// If the request carries a valid user token the user becomes the owner and
/// first participant of the pool, otherwise the pool is created without owner.
async fn pools_post(
    State(db): State<DatabaseConnection>,
    user_id: Result<Autenticated<UserId>, UserClaimsRejection>,
    PoolCreateDto { title }: PoolCreateDto,
) -> Result<PoolCreateResponseDto, PoolCreateError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PoolCreateError::BlankTitle);
    }

    let owner = match user_id {
        Ok(user_id) => Some(user_id.into_inner()),
        Err(rejection) => {
            tracing::debug!("Creating a pool without owner: {rejection}");
            None
        }
    };

    for _ in 0..CODE_ATTEMPTS {
        let code = generate_code();
        match insert_pool(&db, title, &code, owner).await {
            Ok(id) => return Ok(PoolCreateResponseDto { id, code }),
            Err(err) => {
                // check if it's a collision
                if Pool::find()
                    .filter(pool::Column::Code.eq(code.as_str()))
                    .count(&db)
                    .await?
                    > 0
                {
                    tracing::debug!("Code {code} is already taken, drawing another one");
                    continue;
                }
                return Err(err.into());
            }
        }
    }

    tracing::error!("No free pool code found after {CODE_ATTEMPTS} attempts");
    Err(PoolCreateError::InternalServerError)
}

#[utoipa::path(
    post, path = "/join",
    request_body = PoolJoinDto,
    responses(
        (status = CREATED, description = "The pool was joined"),
        PoolJoinError
    ),
    security(("user_token" = []))
)]
#[debug_handler(state = crate::app::AppState)]
/// Join a pool
///
/// Become a participant of the pool with the given code. If the pool has no
/// owner, the user becomes its owner.
async fn pools_join(
    State(db): State<DatabaseConnection>,
    user_id: Autenticated<UserId>,
    PoolJoinDto { code }: PoolJoinDto,
) -> Result<StatusCode, PoolJoinError> {
    let user_id = user_id.into_inner();
    let code = code.trim().to_uppercase();

    let Some(pool) = Pool::find()
        .filter(pool::Column::Code.eq(code))
        .one(&db)
        .await?
    else {
        return Err(PoolJoinError::UnknownCode);
    };
    let pool_id = pool.pool_id();

    if find_participant(&db, pool_id, user_id).await?.is_some() {
        return Err(PoolJoinError::AlreadyJoined);
    }

    let participant = participant::ActiveModel {
        id: Set(ParticipantId::gen().into()),
        pool_id: Set(pool_id.into()),
        user_id: Set(user_id.into()),
        joined_at: NotSet,
    };
    let joined = db
        .transaction::<_, (), DbErr>(move |txn| {
            Box::pin(async move {
                Pool::update_many()
                    .col_expr(pool::Column::OwnerId, Expr::value(Uuid::from(user_id)))
                    .filter(pool::Column::Id.eq(pool_id))
                    .filter(pool::Column::OwnerId.is_null())
                    .exec(txn)
                    .await?;
                participant.insert(txn).await?;
                Ok(())
            })
        })
        .await
        .map_err(super::transaction_error);

    match joined {
        Ok(()) => Ok(StatusCode::CREATED),
        Err(err) => {
            // the unique index refused a participation that raced this one
            if find_participant(&db, pool_id, user_id).await?.is_some() {
                return Err(PoolJoinError::AlreadyJoined);
            }
            Err(err.into())
        }
    }
}

#[utoipa::path(
    get, path = "/",
    responses(PaginatedDto<PoolQueryDto>, PoolListGetError),
    params(PaginationParams),
    security(("user_token" = []))
)]
#[debug_handler(state = crate::app::AppState)]
/// List the pools of the user
///
/// Get the pools the current user participates in, most recent first.
async fn pools_get(
    State(db): State<DatabaseConnection>,
    user_id: Autenticated<UserId>,
    PaginationParams { page, page_size }: PaginationParams,
) -> Result<PaginatedDto<PoolQueryDto>, PoolListGetError> {
    let joined_pools = Query::select()
        .column(participant::Column::PoolId)
        .from(Participant)
        .and_where(participant::Column::UserId.eq(user_id.into_inner()))
        .to_owned();
    let paginated_query = Pool::find()
        .filter(pool::Column::Id.in_subquery(joined_pools))
        .find_also_related(User)
        .order_by_desc(pool::Column::CreatedAt)
        .order_by_asc(pool::Column::Id)
        .paginate(&db, page_size.get());

    let fetch_pageinfo = PageInfo::new(page, page_size.get(), &paginated_query);
    let fetch_page = paginated_query.fetch_page(page);
    let (pools, page_info) = tokio::try_join!(fetch_page, fetch_pageinfo)?;

    let data = try_join_all(
        pools
            .into_iter()
            .map(|(pool, owner)| pool_summary(&db, pool, owner)),
    )
    .await?;

    Ok(PaginatedDto {
        data: data.into_boxed_slice(),
        page: page_info,
    })
}

pub(super) fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S>
where
    DatabaseConnection: FromRef<S>,
    AuthKey: FromRef<S>,
{
    let mut router =
        OpenApiRouter::with_openapi(bolao_server_dtos::pool::ApiComponents::openapi())
            .routes(routes!(pools_count))
            .routes(routes!(pools_post, pools_get))
            .routes(routes!(pools_join))
            .nest("/{pool}", single::router());
    super::tag_api(router.get_openapi_mut(), "Pools");
    router
}
