//! Plan upgrade flow. Decides between hosted checkout and the in-app
//! confirmation route; pricing rules live with the billing provider.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIRM_ROUTE: &str = "/billing/confirm";

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("billing service failed: {0}")]
    Service(String),
    #[error("billing service returned an empty checkout url")]
    EmptyCheckoutUrl,
}

pub type BillingResult<T> = std::result::Result<T, BillingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Starter,
    Pro,
    Business,
}

impl PlanTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Business => "business",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub const fn from_is_yearly(is_yearly: bool) -> Self {
        if is_yearly {
            Self::Yearly
        } else {
            Self::Monthly
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionAction {
    Upgrade,
    Downgrade,
    Addon,
}

impl SubscriptionAction {
    /// Upgrade or downgrade between two tiers; `None` when they match.
    pub fn between(current: PlanTier, target: PlanTier) -> Option<Self> {
        match target.cmp(&current) {
            std::cmp::Ordering::Greater => Some(Self::Upgrade),
            std::cmp::Ordering::Less => Some(Self::Downgrade),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upgrade => "upgrade",
            Self::Downgrade => "downgrade",
            Self::Addon => "addon",
        }
    }
}

impl fmt::Display for SubscriptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub tier: PlanTier,
    pub billing_period: BillingPeriod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionChangeRequest {
    pub account_id: String,
    pub target_tier: PlanTier,
    pub action: SubscriptionAction,
    pub billing_period: BillingPeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPlan {
    pub is_yearly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPreview {
    pub current_plan: CurrentPlan,
}

#[async_trait]
pub trait BillingService: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> BillingResult<CheckoutSession>;
    async fn preview_subscription_change(
        &self,
        request: &SubscriptionChangeRequest,
    ) -> BillingResult<SubscriptionPreview>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_id: String,
    pub has_active_subscription: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRedirect {
    /// Hosted checkout page for accounts without a subscription.
    Checkout { url: String },
    /// In-app route confirming a change to an existing subscription.
    Confirm { path: String },
}

/// Where to send the user after they pick `target` with `action`.
///
/// For existing subscriptions the billing period is taken from the current
/// plan rather than from `requested_period`.
pub async fn plan_redirect(
    service: &dyn BillingService,
    account: &Account,
    target: PlanTier,
    action: SubscriptionAction,
    requested_period: BillingPeriod,
) -> BillingResult<PlanRedirect> {
    if !account.has_active_subscription {
        let session = service
            .create_checkout_session(&CheckoutRequest {
                tier: target,
                billing_period: requested_period,
            })
            .await?;
        if session.url.trim().is_empty() {
            return Err(BillingError::EmptyCheckoutUrl);
        }
        tracing::info!(tier = target.as_str(), "redirecting to hosted checkout");
        return Ok(PlanRedirect::Checkout { url: session.url });
    }

    let preview = service
        .preview_subscription_change(&SubscriptionChangeRequest {
            account_id: account.account_id.clone(),
            target_tier: target,
            action,
            billing_period: requested_period,
        })
        .await?;
    let period = BillingPeriod::from_is_yearly(preview.current_plan.is_yearly);
    let path = format!(
        "{CONFIRM_ROUTE}?tier={}&action={}&period={}",
        target.as_str(),
        action.as_str(),
        period.as_str()
    );
    Ok(PlanRedirect::Confirm { path })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakeBilling {
        is_yearly: bool,
        checkout_url: String,
        checkouts: Mutex<Vec<CheckoutRequest>>,
        previews: Mutex<Vec<SubscriptionChangeRequest>>,
    }

    #[async_trait]
    impl BillingService for FakeBilling {
        async fn create_checkout_session(
            &self,
            request: &CheckoutRequest,
        ) -> BillingResult<CheckoutSession> {
            self.checkouts.lock().unwrap().push(request.clone());
            Ok(CheckoutSession {
                url: self.checkout_url.clone(),
            })
        }

        async fn preview_subscription_change(
            &self,
            request: &SubscriptionChangeRequest,
        ) -> BillingResult<SubscriptionPreview> {
            self.previews.lock().unwrap().push(request.clone());
            Ok(SubscriptionPreview {
                current_plan: CurrentPlan {
                    is_yearly: self.is_yearly,
                },
            })
        }
    }

    fn account(active: bool) -> Account {
        Account {
            account_id: "acct_1".into(),
            has_active_subscription: active,
        }
    }

    #[tokio::test]
    async fn new_customers_go_to_hosted_checkout() {
        let billing = FakeBilling {
            checkout_url: "https://checkout.example/session/abc".into(),
            ..FakeBilling::default()
        };
        let redirect = plan_redirect(
            &billing,
            &account(false),
            PlanTier::Pro,
            SubscriptionAction::Upgrade,
            BillingPeriod::Yearly,
        )
        .await
        .unwrap();
        assert_eq!(
            redirect,
            PlanRedirect::Checkout {
                url: "https://checkout.example/session/abc".into()
            }
        );
        assert_eq!(
            billing.checkouts.lock().unwrap()[0],
            CheckoutRequest {
                tier: PlanTier::Pro,
                billing_period: BillingPeriod::Yearly
            }
        );
        assert!(billing.previews.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn subscribers_confirm_with_current_billing_period() {
        let billing = FakeBilling {
            is_yearly: true,
            ..FakeBilling::default()
        };
        let redirect = plan_redirect(
            &billing,
            &account(true),
            PlanTier::Business,
            SubscriptionAction::Upgrade,
            BillingPeriod::Monthly,
        )
        .await
        .unwrap();
        assert_eq!(
            redirect,
            PlanRedirect::Confirm {
                path: "/billing/confirm?tier=business&action=upgrade&period=yearly".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_checkout_url_is_an_error() {
        let billing = FakeBilling::default();
        let err = plan_redirect(
            &billing,
            &account(false),
            PlanTier::Starter,
            SubscriptionAction::Upgrade,
            BillingPeriod::Monthly,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BillingError::EmptyCheckoutUrl));
    }

    #[test]
    fn action_between_tiers() {
        assert_eq!(
            SubscriptionAction::between(PlanTier::Starter, PlanTier::Pro),
            Some(SubscriptionAction::Upgrade)
        );
        assert_eq!(
            SubscriptionAction::between(PlanTier::Business, PlanTier::Free),
            Some(SubscriptionAction::Downgrade)
        );
        assert_eq!(SubscriptionAction::between(PlanTier::Pro, PlanTier::Pro), None);
    }

    #[test]
    fn wire_names_match_service_contract() {
        let json = serde_json::to_value(SubscriptionChangeRequest {
            account_id: "acct_1".into(),
            target_tier: PlanTier::Pro,
            action: SubscriptionAction::Addon,
            billing_period: BillingPeriod::Monthly,
        })
        .unwrap();
        assert_eq!(json["accountId"], "acct_1");
        assert_eq!(json["targetTier"], "pro");
        assert_eq!(json["action"], "addon");
        assert_eq!(json["billingPeriod"], "monthly");

        let preview: SubscriptionPreview =
            serde_json::from_str(r#"{ "currentPlan": { "isYearly": false } }"#).unwrap();
        assert!(!preview.current_plan.is_yearly);
    }
}
