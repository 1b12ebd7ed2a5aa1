//! Many-to-many relation integration tests
//!
//! Exercises the full pipeline against an in-memory query client: key
//! resolution, query shapes, eager loading, pivot extras, and the
//! preload registry.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use opal_orm::{
    ColumnDef, Entity, EntityDescriptor, Extras, ManyToMany, ManyToManyOptions, OrmError,
    OrmResult, PreloadContext, QueryClient, RelationSet, RelationTarget, SqlRow,
};

// -- test entities ---------------------------------------------------------

static USER_DESCRIPTOR: Lazy<EntityDescriptor> = Lazy::new(|| {
    EntityDescriptor::new("User", "users")
        .column(ColumnDef::new("id").primary())
        .column(ColumnDef::new("uid"))
        .column(ColumnDef::new("username"))
});

static SKILL_DESCRIPTOR: Lazy<EntityDescriptor> = Lazy::new(|| {
    EntityDescriptor::new("Skill", "skills")
        .column(ColumnDef::new("id").primary())
        .column(ColumnDef::new("name"))
});

#[derive(Debug, Default)]
struct User {
    id: Option<i64>,
    uid: Option<i64>,
    username: Option<String>,
    extras: Extras,
    skills: Vec<Skill>,
}

impl User {
    fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl Entity for User {
    fn descriptor() -> &'static EntityDescriptor {
        &USER_DESCRIPTOR
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "id" => self.id.map(Value::from),
            "uid" => self.uid.map(Value::from),
            "username" => self.username.clone().map(Value::from),
            _ => None,
        }
    }

    fn from_row(row: &SqlRow) -> OrmResult<Self> {
        Ok(Self {
            id: row.get("id").and_then(Value::as_i64),
            uid: row.get("uid").and_then(Value::as_i64),
            username: row
                .get("username")
                .and_then(Value::as_str)
                .map(str::to_string),
            extras: Extras::default(),
            skills: Vec::new(),
        })
    }

    fn extras(&self) -> &Extras {
        &self.extras
    }

    fn extras_mut(&mut self) -> &mut Extras {
        &mut self.extras
    }
}

impl RelationTarget<Skill> for User {
    fn set_related(&mut self, relation: &str, related: Vec<Skill>) {
        assert_eq!(relation, "skills");
        self.skills = related;
    }
}

#[derive(Debug, Default)]
struct Skill {
    id: Option<i64>,
    name: Option<String>,
    extras: Extras,
}

impl Entity for Skill {
    fn descriptor() -> &'static EntityDescriptor {
        &SKILL_DESCRIPTOR
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "id" => self.id.map(Value::from),
            "name" => self.name.clone().map(Value::from),
            _ => None,
        }
    }

    fn from_row(row: &SqlRow) -> OrmResult<Self> {
        Ok(Self {
            id: row.get("id").and_then(Value::as_i64),
            name: row.get("name").and_then(Value::as_str).map(str::to_string),
            extras: Extras::default(),
        })
    }

    fn extras(&self) -> &Extras {
        &self.extras
    }

    fn extras_mut(&mut self) -> &mut Extras {
        &mut self.extras
    }
}

// -- fake client -----------------------------------------------------------

/// Records every issued query and replays canned result sets in order
#[derive(Default)]
struct FakeClient {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    responses: Mutex<VecDeque<Vec<SqlRow>>>,
}

impl FakeClient {
    fn new() -> Self {
        Self::default()
    }

    fn respond_with(self, rows: Vec<SqlRow>) -> Self {
        self.responses.lock().unwrap().push_back(rows);
        self
    }

    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryClient for FakeClient {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<SqlRow>> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

fn skill_row(id: i64, name: &str, user_id: i64) -> SqlRow {
    SqlRow::new()
        .with("id", json!(id))
        .with("name", json!(name))
        .with("pivot_user_id", json!(user_id))
        .with("pivot_skill_id", json!(id))
}

fn skills_relation() -> ManyToMany<User, Skill> {
    ManyToMany::conventional("skills")
}

// -- query shapes ----------------------------------------------------------

#[test]
fn single_parent_query_shape() {
    let relation = skills_relation();
    let user = User::with_id(1);

    let query = relation.get_query(&user, &PreloadContext::new()).unwrap();
    let (sql, params) = query.to_sql_with_params();

    assert_eq!(
        sql,
        "SELECT skills.*, skill_user.user_id AS pivot_user_id, \
         skill_user.skill_id AS pivot_skill_id \
         FROM skills \
         INNER JOIN skill_user ON skills.id = skill_user.skill_id \
         WHERE skill_user.user_id = $1"
    );
    assert_eq!(params, vec![json!(1)]);
}

#[test]
fn eager_query_uses_in_clause() {
    let relation = skills_relation();
    let parents = vec![User::with_id(1), User::with_id(2)];

    let query = relation
        .get_eager_query(&parents, &PreloadContext::new())
        .unwrap();
    let (sql, params) = query.to_sql_with_params();

    assert!(sql.ends_with("WHERE skill_user.user_id IN ($1, $2)"));
    assert_eq!(params, vec![json!(1), json!(2)]);
}

#[test]
fn pivot_columns_are_aliased_into_projection() {
    let relation: ManyToMany<User, Skill> = ManyToMany::new(
        "skills",
        ManyToManyOptions::new().pivot_columns(["proficiency"]),
    );
    let user = User::with_id(1);

    let sql = relation
        .get_query(&user, &PreloadContext::new())
        .unwrap()
        .to_sql();

    assert!(sql.contains("skill_user.proficiency AS pivot_proficiency"));
}

#[test]
fn context_pivot_columns_extend_static_ones() {
    let relation: ManyToMany<User, Skill> = ManyToMany::new(
        "skills",
        ManyToManyOptions::new().pivot_columns(["proficiency"]),
    );
    let user = User::with_id(1);

    let mut ctx = PreloadContext::new();
    ctx.pivot_columns(["proficiency", "created_at"]);

    let sql = relation.get_query(&user, &ctx).unwrap().to_sql();

    assert_eq!(
        sql.matches("skill_user.proficiency AS pivot_proficiency").count(),
        1
    );
    assert!(sql.contains("skill_user.created_at AS pivot_created_at"));
}

#[test]
fn custom_pivot_keys_change_join_and_filter() {
    let relation: ManyToMany<User, Skill> = ManyToMany::new(
        "skills",
        ManyToManyOptions::new()
            .pivot_table("user_skills")
            .pivot_foreign_key("owner_id")
            .pivot_related_foreign_key("ability_id"),
    );
    let user = User::with_id(7);

    let (sql, params) = relation
        .get_query(&user, &PreloadContext::new())
        .unwrap()
        .to_sql_with_params();

    assert_eq!(
        sql,
        "SELECT skills.*, user_skills.owner_id AS pivot_owner_id, \
         user_skills.ability_id AS pivot_ability_id \
         FROM skills \
         INNER JOIN user_skills ON skills.id = user_skills.ability_id \
         WHERE user_skills.owner_id = $1"
    );
    assert_eq!(params, vec![json!(7)]);
}

#[test]
fn overridden_local_key_keeps_conventional_pivot_column() {
    let relation: ManyToMany<User, Skill> =
        ManyToMany::new("skills", ManyToManyOptions::new().local_key("uid"));
    let mut user = User::with_id(1);
    user.uid = Some(50);

    let (sql, params) = relation
        .get_query(&user, &PreloadContext::new())
        .unwrap()
        .to_sql_with_params();

    // The pivot column name stays anchored to the primary key
    assert!(sql.contains("WHERE skill_user.user_id = $1"));
    assert_eq!(params, vec![json!(50)]);
}

#[test]
fn eager_query_rejects_empty_parent_set() {
    let relation = skills_relation();
    let parents: Vec<User> = Vec::new();

    let err = relation
        .get_eager_query(&parents, &PreloadContext::new())
        .unwrap_err();
    assert!(matches!(err, OrmError::Query(_)));
}

#[test]
fn undefined_local_value_is_rejected() {
    let relation = skills_relation();
    let user = User::default();

    let err = relation
        .get_query(&user, &PreloadContext::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot preload skills, value of User.id is undefined"
    );

    let parents = vec![User::with_id(1), User::default()];
    let err = relation
        .get_eager_query(&parents, &PreloadContext::new())
        .unwrap_err();
    assert!(matches!(err, OrmError::UndefinedLocalValue { .. }));
}

#[test]
fn boot_is_idempotent_and_caches_failure() {
    let relation = skills_relation();
    let first = relation.boot().unwrap().clone();
    let second = relation.boot().unwrap().clone();
    assert_eq!(first, second);

    let broken: ManyToMany<User, Skill> =
        ManyToMany::new("skills", ManyToManyOptions::new().local_key("slug"));
    let err = broken.boot().unwrap_err();
    assert_eq!(
        err.to_string(),
        "E_MISSING_RELATED_LOCAL_KEY: User.slug required by User.skills relation is missing"
    );
    // Same cached outcome on the second call
    assert_eq!(broken.boot().unwrap_err(), err);
}

// -- eager loading ---------------------------------------------------------

#[tokio::test]
async fn preload_assigns_rows_and_pivot_extras() {
    let registry = RelationSet::<User>::new();
    registry.declare(Arc::new(skills_relation()));

    let client = FakeClient::new().respond_with(vec![
        skill_row(1, "Programming", 1),
        skill_row(2, "Cooking", 1),
    ]);
    let mut users = vec![User::with_id(1)];

    registry
        .preload("skills", &mut users, &client, None)
        .await
        .unwrap();

    let skills = &users[0].skills;
    assert_eq!(skills.len(), 2);
    assert_eq!(skills[0].name.as_deref(), Some("Programming"));
    assert_eq!(skills[1].name.as_deref(), Some("Cooking"));
    assert_eq!(skills[0].extras().get("pivot_user_id"), Some(&json!(1)));
    assert_eq!(skills[0].extras().get("pivot_skill_id"), Some(&json!(1)));
    assert_eq!(skills[1].extras().get("pivot_skill_id"), Some(&json!(2)));

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("IN ($1)"));
    assert_eq!(calls[0].1, vec![json!(1)]);
}

#[tokio::test]
async fn preload_fans_out_shared_rows_as_distinct_instances() {
    let registry = RelationSet::<User>::new();
    registry.declare(Arc::new(skills_relation()));

    // Skill 2 belongs to both users; skill 1 only to user 1
    let client = FakeClient::new().respond_with(vec![
        skill_row(1, "Programming", 1),
        skill_row(2, "Cooking", 1),
        skill_row(2, "Cooking", 2),
    ]);
    let mut users = vec![User::with_id(1), User::with_id(2)];

    registry
        .preload("skills", &mut users, &client, None)
        .await
        .unwrap();

    assert_eq!(users[0].skills.len(), 2);
    assert_eq!(users[1].skills.len(), 1);
    assert_eq!(users[1].skills[0].name.as_deref(), Some("Cooking"));

    // Each parent gets its own instance with its own pivot extras
    assert_eq!(
        users[0].skills[1].extras().get("pivot_user_id"),
        Some(&json!(1))
    );
    assert_eq!(
        users[1].skills[0].extras().get("pivot_user_id"),
        Some(&json!(2))
    );
}

#[tokio::test]
async fn preload_leaves_unmatched_parents_with_empty_collections() {
    let registry = RelationSet::<User>::new();
    registry.declare(Arc::new(skills_relation()));

    let client = FakeClient::new().respond_with(vec![skill_row(1, "Programming", 1)]);
    let mut users = vec![User::with_id(1), User::with_id(2)];

    registry
        .preload("skills", &mut users, &client, None)
        .await
        .unwrap();

    assert_eq!(users[0].skills.len(), 1);
    assert!(users[1].skills.is_empty());
}

#[tokio::test]
async fn preload_carries_configured_pivot_columns_into_extras() {
    let registry = RelationSet::<User>::new();
    registry.declare(Arc::new(ManyToMany::<User, Skill>::new(
        "skills",
        ManyToManyOptions::new().pivot_columns(["proficiency"]),
    )));

    let client = FakeClient::new().respond_with(vec![
        skill_row(1, "Programming", 1).with("pivot_proficiency", json!("Master")),
        skill_row(2, "Cooking", 1).with("pivot_proficiency", json!("Beginner")),
    ]);
    let mut users = vec![User::with_id(1)];

    registry
        .preload("skills", &mut users, &client, None)
        .await
        .unwrap();

    let calls = client.calls();
    assert!(calls[0].0.contains("skill_user.proficiency AS pivot_proficiency"));

    let skills = &users[0].skills;
    assert_eq!(
        skills[0].extras().get("pivot_proficiency"),
        Some(&json!("Master"))
    );
    assert_eq!(
        skills[1].extras().get("pivot_proficiency"),
        Some(&json!("Beginner"))
    );
}

#[tokio::test]
async fn preload_customizer_adds_pivot_columns() {
    let registry = RelationSet::<User>::new();
    registry.declare(Arc::new(skills_relation()));

    let client = FakeClient::new().respond_with(vec![skill_row(1, "Programming", 1)
        .with("pivot_proficiency", json!("Master"))]);
    let mut users = vec![User::with_id(1)];

    let customize = |ctx: &mut PreloadContext| {
        ctx.pivot_columns(["proficiency"]);
    };
    registry
        .preload("skills", &mut users, &client, Some(&customize))
        .await
        .unwrap();

    let calls = client.calls();
    assert!(calls[0].0.contains("skill_user.proficiency AS pivot_proficiency"));
    assert_eq!(
        users[0].skills[0].extras().get("pivot_proficiency"),
        Some(&json!("Master"))
    );
}

#[tokio::test]
async fn preload_empty_parent_set_issues_no_queries() {
    let registry = RelationSet::<User>::new();
    registry.declare(Arc::new(skills_relation()));

    let client = FakeClient::new();
    let mut users: Vec<User> = Vec::new();

    registry
        .preload("skills", &mut users, &client, None)
        .await
        .unwrap();
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn preload_unknown_relation_fails_even_on_empty_set() {
    let registry = RelationSet::<User>::new();
    registry.declare(Arc::new(skills_relation()));

    let client = FakeClient::new();
    let mut users: Vec<User> = Vec::new();

    let err = registry
        .preload("hobbies", &mut users, &client, None)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "E_UNDEFINED_RELATION: hobbies is not defined as a relationship on User"
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn preload_missing_local_value_reports_contract_error() {
    let registry = RelationSet::<User>::new();
    registry.declare(Arc::new(skills_relation()));

    let client = FakeClient::new();
    let mut users = vec![User::default()];

    let err = registry
        .preload("skills", &mut users, &client, None)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot preload skills, value of User.id is undefined"
    );
    assert!(client.calls().is_empty());
}
