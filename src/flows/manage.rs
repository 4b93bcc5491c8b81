//! Admin dashboard forms: courts, coupons, announcements and accounts.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::errors::{AppError, AppResult, FieldErrors};
use crate::models::{Account, Availability, Coupon, NewAnnouncement, NewCoupon, NewCourt, Role};
use crate::services::api::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourtForm {
    pub name: String,
    pub kind: String,
    pub location: String,
    pub rate: Option<f64>,
    pub capacity: Option<u32>,
    pub availability: Option<Availability>,
    pub description: String,
    pub amenities: Vec<String>,
    pub image: String,
}

impl CourtForm {
    pub fn validate(&self) -> Result<NewCourt, FieldErrors> {
        let mut errors = FieldErrors::new();
        for (field, value) in [
            ("name", &self.name),
            ("type", &self.kind),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                errors.push(field, "This field is required");
            }
        }
        match self.rate {
            None => errors.push("price", "This field is required"),
            Some(rate) if !rate.is_finite() || rate < 0.0 => {
                errors.push("price", "Price must be zero or more")
            }
            Some(_) => {}
        }
        match &self.availability {
            None => errors.push("availability", "This field is required"),
            Some(Availability::Slots(0)) => {
                errors.push("availability", "At least one slot must be available")
            }
            Some(Availability::Description(text)) if text.trim().is_empty() => {
                errors.push("availability", "This field is required")
            }
            Some(_) => {}
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewCourt {
            name: self.name.trim().to_string(),
            kind: self.kind.trim().to_string(),
            location: self.location.trim().to_string(),
            rate: self.rate.unwrap_or_default(),
            capacity: self.capacity.unwrap_or(0),
            availability: self
                .availability
                .clone()
                .unwrap_or(Availability::Slots(1)),
            description: self.description.trim().to_string(),
            amenities: self
                .amenities
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect::<BTreeSet<_>>(),
            image: self.image.trim().to_string(),
        })
    }
}

pub async fn add_court(api: &ApiClient, form: &CourtForm) -> AppResult<String> {
    let court = form.validate().map_err(AppError::Validation)?;
    let id = api.create_court(&court).await?;
    tracing::info!(court_id = %id, name = %court.name, "court added");
    Ok(id)
}

pub async fn edit_court(api: &ApiClient, id: &str, form: &CourtForm) -> AppResult<()> {
    let court = form.validate().map_err(AppError::Validation)?;
    api.update_court(id, &court).await?;
    tracing::info!(court_id = %id, "court updated");
    Ok(())
}

pub async fn remove_court(api: &ApiClient, id: &str) -> AppResult<()> {
    api.delete_court(id).await?;
    tracing::info!(court_id = %id, "court deleted");
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponForm {
    pub code: String,
    pub title: String,
    pub description: String,
    pub discount_amount: Option<f64>,
}

impl CouponForm {
    /// `editing` is the id of the coupon being edited, which may keep its code.
    pub fn validate(&self, existing: &[Coupon], editing: Option<&str>) -> Result<NewCoupon, FieldErrors> {
        let mut errors = FieldErrors::new();
        let code = self.code.trim();
        if code.is_empty() {
            errors.push("code", "This field is required");
        } else if existing
            .iter()
            .any(|c| c.matches_code(code) && Some(c.id.as_str()) != editing)
        {
            errors.push("code", format!("Coupon code {code} already exists"));
        }
        if self.title.trim().is_empty() {
            errors.push("title", "This field is required");
        }
        match self.discount_amount {
            None => errors.push("discountAmount", "This field is required"),
            Some(amount) if !amount.is_finite() || amount <= 0.0 => {
                errors.push("discountAmount", "Discount must be greater than zero")
            }
            Some(_) => {}
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewCoupon {
            code: code.to_uppercase(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            discount_amount: self.discount_amount.unwrap_or_default(),
        })
    }
}

pub async fn add_coupon(api: &ApiClient, form: &CouponForm) -> AppResult<String> {
    let existing = api.coupons().await?;
    let coupon = form.validate(&existing, None).map_err(AppError::Validation)?;
    let id = api.create_coupon(&coupon).await?;
    tracing::info!(coupon_id = %id, code = %coupon.code, "coupon added");
    Ok(id)
}

pub async fn edit_coupon(api: &ApiClient, id: &str, form: &CouponForm) -> AppResult<()> {
    let existing = api.coupons().await?;
    let coupon = form
        .validate(&existing, Some(id))
        .map_err(AppError::Validation)?;
    api.update_coupon(id, &coupon).await?;
    tracing::info!(coupon_id = %id, "coupon updated");
    Ok(())
}

pub async fn remove_coupon(api: &ApiClient, id: &str) -> AppResult<()> {
    api.delete_coupon(id).await?;
    tracing::info!(coupon_id = %id, "coupon deleted");
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
}

impl AnnouncementForm {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<NewAnnouncement, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.push("title", "This field is required");
        }
        if self.content.trim().is_empty() {
            errors.push("content", "This field is required");
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewAnnouncement {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            created_at: now,
        })
    }
}

pub async fn publish_announcement(api: &ApiClient, form: &AnnouncementForm) -> AppResult<String> {
    let announcement = form.validate(Utc::now()).map_err(AppError::Validation)?;
    let id = api.create_announcement(&announcement).await?;
    tracing::info!(announcement_id = %id, "announcement published");
    Ok(id)
}

pub async fn edit_announcement(api: &ApiClient, id: &str, form: &AnnouncementForm) -> AppResult<()> {
    let announcement = form.validate(Utc::now()).map_err(AppError::Validation)?;
    api.update_announcement(id, &announcement).await
}

pub async fn remove_announcement(api: &ApiClient, id: &str) -> AppResult<()> {
    api.delete_announcement(id).await
}

/// All accounts with a search box, backing the users and members pages.
pub struct UserDirectory {
    accounts: Vec<Account>,
    search: String,
}

impl UserDirectory {
    pub async fn mount(api: &ApiClient) -> AppResult<Self> {
        Ok(Self::from_accounts(api.users().await?))
    }

    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            search: String::new(),
        }
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_lowercase();
    }

    fn matches(&self, account: &Account) -> bool {
        self.search.is_empty()
            || account.email.to_lowercase().contains(&self.search)
            || account.name.to_lowercase().contains(&self.search)
    }

    pub fn filtered(&self) -> Vec<&Account> {
        self.accounts.iter().filter(|a| self.matches(a)).collect()
    }

    pub fn members(&self) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|a| a.role == Role::Member && self.matches(a))
            .collect()
    }

    /// Changes an account's role and mirrors it locally.
    pub async fn set_role(&mut self, api: &ApiClient, email: &str, role: Role) -> AppResult<()> {
        if !self.accounts.iter().any(|a| a.email == email) {
            return Err(AppError::NotFound(format!("account {email}")));
        }
        api.set_role(email, role).await?;
        if let Some(account) = self.accounts.iter_mut().find(|a| a.email == email) {
            account.role = role;
        }
        tracing::info!(email, %role, "role changed");
        Ok(())
    }

    pub async fn remove(&mut self, api: &ApiClient, id: &str) -> AppResult<()> {
        api.delete_user(id).await?;
        self.accounts.retain(|a| a.id.as_deref() != Some(id));
        tracing::info!(user_id = %id, "account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(id: &str, code: &str) -> Coupon {
        Coupon {
            id: id.into(),
            code: code.into(),
            title: "t".into(),
            description: String::new(),
            discount_amount: 50.0,
        }
    }

    #[test]
    fn test_court_form_reports_every_missing_field() {
        let errors = CourtForm::default().validate().unwrap_err();
        for field in ["name", "type", "location", "price", "availability"] {
            assert!(errors.get(field).is_some(), "{field} should be required");
        }
    }

    #[test]
    fn test_court_form_trims_and_dedupes_amenities() {
        let form = CourtForm {
            name: " Center Court ".into(),
            kind: "Tennis".into(),
            location: "North".into(),
            rate: Some(500.0),
            capacity: Some(4),
            availability: Some(Availability::Slots(6)),
            amenities: vec!["Lights".into(), " Lights".into(), "".into()],
            ..Default::default()
        };
        let court = form.validate().unwrap();
        assert_eq!(court.name, "Center Court");
        assert_eq!(court.amenities.len(), 1);
    }

    #[test]
    fn test_coupon_code_must_be_unique() {
        let existing = vec![coupon("k1", "SAVE100")];
        let form = CouponForm {
            code: "save100".into(),
            title: "Again".into(),
            description: String::new(),
            discount_amount: Some(100.0),
        };
        let errors = form.validate(&existing, None).unwrap_err();
        assert!(errors.get("code").is_some());
        // Editing the same coupon may keep its code.
        assert!(form.validate(&existing, Some("k1")).is_ok());
    }

    #[test]
    fn test_coupon_discount_must_be_positive() {
        let form = CouponForm {
            code: "ZERO".into(),
            title: "Zero".into(),
            description: String::new(),
            discount_amount: Some(0.0),
        };
        assert!(form.validate(&[], None).unwrap_err().get("discountAmount").is_some());
    }

    #[test]
    fn test_announcement_requires_title_and_content() {
        let errors = AnnouncementForm::default().validate(Utc::now()).unwrap_err();
        assert!(errors.get("title").is_some());
        assert!(errors.get("content").is_some());
    }

    #[test]
    fn test_directory_search_and_members() {
        let account = |email: &str, name: &str, role| Account {
            id: Some(email.into()),
            email: email.into(),
            name: name.into(),
            photo: None,
            role,
            created_at: None,
            last_login: None,
        };
        let mut dir = UserDirectory::from_accounts(vec![
            account("ana@example.com", "Ana", Role::Member),
            account("bo@example.com", "Bo", Role::User),
            account("cy@example.com", "Cy Ana", Role::Admin),
        ]);
        assert_eq!(dir.members().len(), 1);
        dir.set_search("ana");
        assert_eq!(dir.filtered().len(), 2);
        dir.set_search("BO@");
        assert_eq!(dir.filtered().len(), 1);
        assert!(dir.members().is_empty());
    }
}
