use crate::app_state::AppState;
use crate::services::transaction_service::DEFAULT_HISTORY_LIMIT;
use tracing::info;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::auth_dto::{UpdateProfileRequest, UserDto};
use vaultex_primitives::models::dtos::profile_dto::UserProfileResponse;
use vaultex_primitives::models::dtos::transaction_dto::TransactionDto;
use vaultex_primitives::models::dtos::wallet_dto::{FiatBalanceDto, WalletDto};
use vaultex_primitives::models::entities::{UpsertUser, User};

pub struct ProfileService;

impl ProfileService {
    pub async fn get_profile(
        state: &AppState,
        user_id: Uuid,
    ) -> Result<UserProfileResponse, ApiError> {
        let user = Self::find_user(state, user_id)?;
        let cryptos = state.ledger.get_cryptocurrencies()?;

        let wallets = state
            .ledger
            .list_user_wallets(user_id)?
            .iter()
            .map(|w| WalletDto::new(w, cryptos.iter().find(|c| c.id == w.crypto_id)))
            .collect();

        let fiat_balance = state
            .ledger
            .get_fiat_balance(user_id, state.config.default_fiat)?;

        let fiat_balances = state
            .ledger
            .list_user_fiat_balances(user_id)?
            .iter()
            .map(FiatBalanceDto::from)
            .collect();

        let transactions = state
            .ledger
            .list_user_transactions(user_id, Some(DEFAULT_HISTORY_LIMIT))?
            .iter()
            .map(TransactionDto::from)
            .collect();

        Ok(UserProfileResponse {
            user: UserDto::from(&user),
            wallets,
            fiat_balance: FiatBalanceDto::from(&fiat_balance),
            fiat_balances,
            transactions,
        })
    }

    /// Only the supplied fields change.
    pub async fn update_profile(
        state: &AppState,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserDto, ApiError> {
        let user = Self::find_user(state, user_id)?;
        let mut changes = UpsertUser::from(&user);

        if let Some(first_name) = req.first_name {
            changes.first_name = Some(first_name);
        }
        if let Some(last_name) = req.last_name {
            changes.last_name = Some(last_name);
        }
        if let Some(country) = req.country {
            changes.country = Some(country);
        }
        if let Some(city) = req.city {
            changes.city = Some(city);
        }

        let updated = state.ledger.upsert_user(&changes)?;
        info!(user_id = %user_id, "profile: updated");

        Ok(UserDto::from(&updated))
    }

    fn find_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
        state
            .ledger
            .get_user(user_id)?
            .ok_or_else(|| ApiError::NotFound(format!("User {}", user_id)))
    }
}
