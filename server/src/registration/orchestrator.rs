//! Bulk Registration Orchestrator
//!
//! Takes a leader and a cart of event/team items, validates composition,
//! settles payment (gateway order or cash token), then writes teams and
//! registrations tagged with the settlement reference.
//!
//! Consistency model: each cart item's team + registration writes commit
//! in one transaction, so an item is never half-written. The cart as a
//! whole is per-item committed: a failure partway leaves earlier items
//! in place, and the delete-and-recreate retry semantics make that state
//! recoverable by resubmitting the same cart.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::core::config::Config;
use crate::db::models::{Event, EventType, PaymentStatus, User};
use crate::db::repository::{registration, team, user as user_repo};
use crate::notify::NotificationSink;
use crate::payments::gateway::PaymentGateway;
use crate::payments::{orders, tokens};
use crate::utils::id::generate_uid;
use crate::utils::{AppError, AppResult};

use super::cart::{self, BulkRegisterRequest, CartItem};

/// Result record for a cart submission.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutcome {
    /// Settlement reference shared by every registration written
    pub order_id: String,
    /// Present for ONLINE carts: handle for the gateway checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_session_id: Option<String>,
    pub total_paise: i64,
    /// Initial per-registration status: PENDING (online) or PAID (cash)
    pub payment_status: PaymentStatus,
    pub items: Vec<ItemOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub event_id: i64,
    pub event_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    /// True when the leader already held a PAID registration and the
    /// whole item was an idempotent no-op
    pub skipped: bool,
    pub participants: Vec<ParticipantOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantOutcome {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub is_shadow: bool,
    /// True when this participant already held a PAID registration for
    /// the event and was left untouched
    pub already_paid: bool,
}

/// Shadow invite queued during a transaction, dispatched after commit.
struct PendingInvite {
    email: String,
    name: String,
    uid: String,
    leader_name: String,
}

/// Register a whole cart.
///
/// Validation runs over the full cart before any settlement or write, so
/// a malformed item aborts with nothing persisted. Settlement happens
/// next (order creation or token redemption), and only then are
/// registrations written, item by item.
pub async fn register_cart(
    pool: &SqlitePool,
    gateway: &dyn PaymentGateway,
    notifier: &NotificationSink,
    config: &Config,
    req: BulkRegisterRequest,
) -> AppResult<RegistrationOutcome> {
    let leader = user_repo::find_by_uid(pool, &req.leader_uid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leader {}", req.leader_uid)))?;

    if req.items.is_empty() {
        return Err(AppError::validation("cart is empty"));
    }

    // Resolve events and validate every item up front (fail-fast).
    let mut events = Vec::with_capacity(req.items.len());
    for item in &req.items {
        let event = crate::db::repository::event::find_by_id(pool, item.event_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Event {}", item.event_id)))?;
        cart::validate_item(&leader.email, &event, item)?;
        events.push(event);
    }

    let total_paise = cart::total_fee_paise(&events);
    let event_ids: Vec<i64> = events.iter().map(|e| e.id).collect();

    // Settlement branch: obtain the reference before any registration
    // row exists.
    let (order_id, payment_session_id, initial_status) = match req.payment_mode {
        crate::db::models::PaymentMode::Online => {
            let return_url = req
                .return_url
                .as_deref()
                .unwrap_or(&config.default_return_url);
            let created = orders::create_order(
                pool,
                gateway,
                &leader,
                total_paise,
                &event_ids,
                return_url,
                &config.webhook_notify_url,
            )
            .await?;
            (
                created.order_id,
                Some(created.payment_session_id),
                PaymentStatus::Pending,
            )
        }
        crate::db::models::PaymentMode::Cash => {
            let code = req
                .cash_token
                .as_deref()
                .ok_or_else(|| AppError::validation("cash_token is required for CASH mode"))?;
            let reference =
                tokens::redeem(pool, code, total_paise, leader.id, &event_ids).await?;
            (reference, None, PaymentStatus::Paid)
        }
    };

    let mut items = Vec::with_capacity(req.items.len());
    for (item, event) in req.items.iter().zip(events.iter()) {
        let (outcome, invites) =
            write_item(pool, &leader, event, item, &order_id, initial_status).await?;
        // Invites go out only after the item's transaction committed.
        for invite in invites {
            notifier.notify_team_invite(invite.email, invite.name, invite.uid, invite.leader_name);
        }
        items.push(outcome);
    }

    info!(
        leader = %leader.uid,
        order_id = %order_id,
        total_paise,
        mode = ?req.payment_mode,
        "Cart registered"
    );

    Ok(RegistrationOutcome {
        order_id,
        payment_session_id,
        total_paise,
        payment_status: initial_status,
        items,
    })
}

/// Write one cart item (team + registrations) in a single transaction.
async fn write_item(
    pool: &SqlitePool,
    leader: &User,
    event: &Event,
    item: &CartItem,
    order_id: &str,
    initial_status: PaymentStatus,
) -> AppResult<(ItemOutcome, Vec<PendingInvite>)> {
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let mut invites = Vec::new();

    // Idempotent no-op: a PAID registration for the leader means this
    // item already went through a successful settlement.
    if let Some(existing) = registration::find_by_user_event(&mut *tx, leader.id, event.id).await? {
        if existing.payment_status == PaymentStatus::Paid {
            return Ok((
                ItemOutcome {
                    event_id: event.id,
                    event_name: event.name.clone(),
                    team_name: None,
                    skipped: true,
                    participants: vec![],
                },
                invites,
            ));
        }
    }

    // Team formation (GROUP only). A leader retrying keeps their prior
    // team row so PAID teammates never dangle; the name is refreshed.
    let (team_id, team_name) = if event.event_type == EventType::Group {
        let supplied = item
            .team_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        match team::find_by_leader_event(&mut *tx, leader.id, event.id).await? {
            Some(existing) => {
                let name = supplied.unwrap_or(&existing.name).to_string();
                if name != existing.name {
                    team::rename(&mut *tx, existing.id, &name).await?;
                }
                (Some(existing.id), Some(name))
            }
            None => {
                let count = team::count_for_event(&mut *tx, event.id).await?;
                let name = supplied
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Team #{}", count + 1));
                let id = team::insert(&mut *tx, &name, leader.id, event.id).await?;
                (Some(id), Some(name))
            }
        }
    } else {
        (None, None)
    };

    let mut participants = Vec::new();

    // Leader first, then teammates; each participant follows the same
    // duplicate policy (PAID → skip, otherwise delete-and-recreate).
    let mut roster: Vec<User> = vec![leader.clone()];
    for tm in &item.teammates {
        let email = cart::normalize_email(&tm.email);
        let user = match user_repo::find_by_email(&mut *tx, &email).await? {
            Some(existing) => existing,
            None => {
                // Shadow identity: incomplete profile, completed at
                // first login with the mailed uid.
                let uid = allocate_uid_tx(&mut tx).await?;
                let id = user_repo::insert(
                    &mut *tx,
                    &uid,
                    &email,
                    tm.name.trim(),
                    None,
                    None,
                    true,
                    initial_status,
                )
                .await?;
                invites.push(PendingInvite {
                    email: email.clone(),
                    name: tm.name.trim().to_string(),
                    uid: uid.clone(),
                    leader_name: leader.name.clone(),
                });
                user_repo::find_by_id(&mut *tx, id)
                    .await?
                    .ok_or_else(|| AppError::internal("shadow user vanished mid-transaction"))?
            }
        };
        roster.push(user);
    }

    for user in &roster {
        let existing = registration::find_by_user_event(&mut *tx, user.id, event.id).await?;
        let already_paid = matches!(&existing, Some(r) if r.payment_status == PaymentStatus::Paid);
        if already_paid {
            participants.push(ParticipantOutcome {
                uid: user.uid.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                is_shadow: user.is_shadow,
                already_paid: true,
            });
            continue;
        }

        if existing.is_some() {
            registration::delete_non_paid(&mut *tx, user.id, event.id).await?;
        }
        registration::insert(&mut *tx, user.id, event.id, team_id, order_id, initial_status)
            .await?;
        // Legacy coarse flag follows the freshest settlement attempt
        user_repo::set_payment_status(&mut *tx, user.id, initial_status).await?;

        participants.push(ParticipantOutcome {
            uid: user.uid.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_shadow: user.is_shadow,
            already_paid: false,
        });
    }

    tx.commit().await.map_err(AppError::from)?;

    Ok((
        ItemOutcome {
            event_id: event.id,
            event_name: event.name.clone(),
            team_name,
            skipped: false,
            participants,
        },
        invites,
    ))
}

/// Allocate a collision-free public uid inside the item transaction.
async fn allocate_uid_tx(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>) -> AppResult<String> {
    loop {
        let uid = generate_uid();
        if user_repo::find_by_uid(&mut **tx, &uid).await?.is_none() {
            return Ok(uid);
        }
    }
}
