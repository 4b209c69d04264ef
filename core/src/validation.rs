//! Form validation as declarative constraint sets.
//!
//! A [`Schema`] is a static list of [`FieldRule`]s. Forms expose their fields
//! by path through [`Fields`]; checking a form yields either `Ok(())` or a
//! [`ValidationErrors`] map holding the first failing message per field.
//! Validation happens before any request is built, so an invalid form never
//! reaches the synchronizer.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::types::{Address, Company, Geo, PostDraft, User, UserDraft};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty after trimming.
    Required,
    Email,
    /// An integer of at least 1.
    PositiveInt,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

const fn rule(field: &'static str, rule: Rule, message: &'static str) -> FieldRule {
    FieldRule {
        field,
        rule,
        message,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(u64),
}

/// A form whose fields can be looked up by dotted path, e.g. `address.city`.
pub trait Fields {
    fn field(&self, path: &str) -> Option<FieldValue<'_>>;
}

/// Field path to message, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s): {}", .errors.len(), .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    rules: &'static [FieldRule],
}

impl Schema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    pub fn check<F: Fields + ?Sized>(&self, form: &F) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for r in self.rules {
            // A field the form does not expose counts as empty.
            let value = form.field(r.field).unwrap_or(FieldValue::Text(""));
            if !satisfies(r.rule, value) {
                errors.add(r.field, r.message);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn satisfies(rule: Rule, value: FieldValue<'_>) -> bool {
    match (rule, value) {
        (Rule::Required, FieldValue::Text(s)) => !s.trim().is_empty(),
        (Rule::Required, FieldValue::Number(_)) => true,
        (Rule::Email, FieldValue::Text(s)) => EMAIL.is_match(s),
        (Rule::Email, FieldValue::Number(_)) => false,
        (Rule::PositiveInt, FieldValue::Number(n)) => n >= 1,
        (Rule::PositiveInt, FieldValue::Text(s)) => s.trim().parse::<i64>().is_ok_and(|n| n >= 1),
    }
}

// ---------------------------------------------------------------------------
// User form
// ---------------------------------------------------------------------------

static USER_RULES: [FieldRule; 10] = [
    rule("name", Rule::Required, "Name is required"),
    rule("username", Rule::Required, "Username is required"),
    rule("email", Rule::Email, "Invalid email"),
    rule("phone", Rule::Required, "Phone is required"),
    rule("website", Rule::Required, "Website is required"),
    rule("company.name", Rule::Required, "Company name is required"),
    rule("address.street", Rule::Required, "Street is required"),
    rule("address.suite", Rule::Required, "Suite is required"),
    rule("address.city", Rule::Required, "City is required"),
    rule("address.zipcode", Rule::Required, "Zipcode is required"),
];

pub static USER_SCHEMA: Schema = Schema::new(&USER_RULES);

/// The editable subset of a user. Catch phrase, bs, and geo are not on the
/// form and are carried over from the user being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company_name: String,
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
}

impl UserForm {
    /// Prefill from an existing user for editing.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            website: user.website.clone(),
            company_name: user.company.name.clone(),
            street: user.address.street.clone(),
            suite: user.address.suite.clone(),
            city: user.address.city.clone(),
            zipcode: user.address.zipcode.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        USER_SCHEMA.check(self)
    }

    /// Validate, then build the draft. `editing` supplies the fields the
    /// form does not show.
    pub fn submit(&self, editing: Option<&User>) -> Result<UserDraft, ValidationErrors> {
        self.validate()?;
        Ok(self.to_draft(editing))
    }

    fn to_draft(&self, editing: Option<&User>) -> UserDraft {
        let (catch_phrase, bs, geo) = match editing {
            Some(u) => (
                u.company.catch_phrase.clone(),
                u.company.bs.clone(),
                u.address.geo.clone(),
            ),
            None => (String::new(), String::new(), Geo::default()),
        };
        UserDraft {
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            company: Company {
                name: self.company_name.clone(),
                catch_phrase,
                bs,
            },
            address: Address {
                street: self.street.clone(),
                suite: self.suite.clone(),
                city: self.city.clone(),
                zipcode: self.zipcode.clone(),
                geo,
            },
        }
    }
}

impl Fields for UserForm {
    fn field(&self, path: &str) -> Option<FieldValue<'_>> {
        let s = match path {
            "name" => &self.name,
            "username" => &self.username,
            "email" => &self.email,
            "phone" => &self.phone,
            "website" => &self.website,
            "company.name" => &self.company_name,
            "address.street" => &self.street,
            "address.suite" => &self.suite,
            "address.city" => &self.city,
            "address.zipcode" => &self.zipcode,
            _ => return None,
        };
        Some(FieldValue::Text(s))
    }
}

// ---------------------------------------------------------------------------
// Post form
// ---------------------------------------------------------------------------

static POST_RULES: [FieldRule; 3] = [
    rule("title", Rule::Required, "Title is required"),
    rule("body", Rule::Required, "Body is required"),
    rule("userId", Rule::PositiveInt, "User id must be at least 1"),
];

pub static POST_SCHEMA: Schema = Schema::new(&POST_RULES);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

impl Default for PostForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            user_id: 1,
        }
    }
}

impl PostForm {
    pub fn from_draft(draft: &PostDraft) -> Self {
        Self {
            title: draft.title.clone(),
            body: draft.body.clone(),
            user_id: draft.user_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        POST_SCHEMA.check(self)
    }

    pub fn submit(&self) -> Result<PostDraft, ValidationErrors> {
        self.validate()?;
        Ok(PostDraft {
            user_id: self.user_id,
            title: self.title.clone(),
            body: self.body.clone(),
        })
    }
}

impl Fields for PostForm {
    fn field(&self, path: &str) -> Option<FieldValue<'_>> {
        match path {
            "title" => Some(FieldValue::Text(&self.title)),
            "body" => Some(FieldValue::Text(&self.body)),
            "userId" => Some(FieldValue::Number(self.user_id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user_form() -> UserForm {
        UserForm {
            name: "Leanne Graham".to_string(),
            username: "Bret".to_string(),
            email: "Sincere@april.biz".to_string(),
            phone: "1-770-736-8031".to_string(),
            website: "hildegard.org".to_string(),
            company_name: "Romaguera-Crona".to_string(),
            street: "Kulas Light".to_string(),
            suite: "Apt. 556".to_string(),
            city: "Gwenborough".to_string(),
            zipcode: "92998-3874".to_string(),
        }
    }

    #[test]
    fn empty_user_form_reports_every_field() {
        let errors = UserForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), USER_SCHEMA.rules().len());
        assert_eq!(errors.get("company.name"), Some("Company name is required"));
        assert_eq!(errors.get("email"), Some("Invalid email"));
    }

    #[test]
    fn whitespace_only_is_missing() {
        let form = UserForm {
            city: "   ".to_string(),
            ..valid_user_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("address.city"), Some("City is required"));
    }

    #[test]
    fn email_format_is_checked() {
        for bad in ["plain", "a@b", "a b@c.d", "@c.d"] {
            let form = UserForm {
                email: bad.to_string(),
                ..valid_user_form()
            };
            assert_eq!(form.validate().unwrap_err().get("email"), Some("Invalid email"), "{bad}");
        }
        assert!(valid_user_form().validate().is_ok());
    }

    #[test]
    fn new_user_gets_default_geo_and_blank_company_extras() {
        let draft = valid_user_form().submit(None).unwrap();
        assert_eq!(draft.address.geo, Geo { lat: "0".into(), lng: "0".into() });
        assert_eq!(draft.company.catch_phrase, "");
        assert_eq!(draft.company.bs, "");
        assert_eq!(draft.company.name, "Romaguera-Crona");
    }

    #[test]
    fn edited_user_keeps_hidden_fields() {
        let user = User {
            id: 1,
            name: "Old".to_string(),
            username: "old".to_string(),
            email: "old@example.com".to_string(),
            phone: "1".to_string(),
            website: "old.org".to_string(),
            company: Company {
                name: "Old Co".to_string(),
                catch_phrase: "phrase".to_string(),
                bs: "bs".to_string(),
            },
            address: Address {
                street: "s".to_string(),
                suite: "su".to_string(),
                city: "c".to_string(),
                zipcode: "z".to_string(),
                geo: Geo {
                    lat: "-37.3159".to_string(),
                    lng: "81.1496".to_string(),
                },
            },
        };
        let mut form = UserForm::from_user(&user);
        form.name = "New".to_string();
        let draft = form.submit(Some(&user)).unwrap();
        assert_eq!(draft.name, "New");
        assert_eq!(draft.company.catch_phrase, "phrase");
        assert_eq!(draft.address.geo.lat, "-37.3159");
    }

    #[test]
    fn post_form_requires_title_body_and_positive_user() {
        let form = PostForm {
            title: " ".to_string(),
            body: String::new(),
            user_id: 0,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("userId"), Some("User id must be at least 1"));
    }

    #[test]
    fn post_form_defaults_user_to_one() {
        let form = PostForm {
            title: "A".to_string(),
            body: "B".to_string(),
            ..PostForm::default()
        };
        let draft = form.submit().unwrap();
        assert_eq!(draft.user_id, 1);
        assert_eq!(draft.title, "A");
    }

    #[test]
    fn post_form_keeps_large_user_ids() {
        let draft = PostDraft {
            user_id: u64::MAX,
            title: "A".to_string(),
            body: "B".to_string(),
        };
        let form = PostForm::from_draft(&draft);
        assert!(form.validate().is_ok());
        assert_eq!(form.submit().unwrap(), draft);
    }

    #[test]
    fn first_failing_message_wins() {
        static RULES: [FieldRule; 2] = [
            rule("email", Rule::Required, "Email is required"),
            rule("email", Rule::Email, "Invalid email"),
        ];
        let schema = Schema::new(&RULES);
        let form = UserForm::default();
        assert_eq!(schema.check(&form).unwrap_err().get("email"), Some("Email is required"));
    }

    #[test]
    fn positive_int_accepts_numeric_text() {
        assert!(satisfies(Rule::PositiveInt, FieldValue::Text("3")));
        assert!(!satisfies(Rule::PositiveInt, FieldValue::Text("-1")));
        assert!(!satisfies(Rule::PositiveInt, FieldValue::Text("x")));
    }

    #[test]
    fn error_display_lists_fields() {
        let errors = PostForm {
            title: String::new(),
            ..PostForm::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.to_string(), "2 invalid field(s): body, title");
    }
}
