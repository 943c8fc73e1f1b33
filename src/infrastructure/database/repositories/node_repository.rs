//! SeaORM implementation of NodeRepository

use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{corrupt, db_err};
use crate::domain::node::{Node, NodeData, NodeFilter, NodeRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::node;

/// Largest magnitude representable with four digits, one fractional.
const MAX_POWER_TENTHS: i32 = 9999;

pub struct SeaOrmNodeRepository {
    db: DatabaseConnection,
}

impl SeaOrmNodeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn power_to_tenths(power: Decimal) -> DomainResult<i32> {
    (power.round_dp(1) * Decimal::TEN)
        .to_i32()
        .filter(|t| t.abs() <= MAX_POWER_TENTHS)
        .ok_or_else(|| DomainError::Validation(format!("Power {} out of range", power)))
}

pub(crate) fn tenths_to_power(tenths: i32) -> Decimal {
    Decimal::new(tenths as i64, 1)
}

fn from_model(model: node::Model) -> DomainResult<Node> {
    Ok(Node {
        id: model.id,
        title: model.title,
        slug: model.slug,
        label: model.label,
        level: model.level.parse().map_err(|e| corrupt("node", e))?,
        round_per_minute: model.round_per_minute,
        power: tenths_to_power(model.power_tenths),
        mcc_id: model.mcc_id,
    })
}

/// Escape LIKE wildcards so user input only matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl NodeRepository for SeaOrmNodeRepository {
    async fn find(&self, filter: NodeFilter) -> DomainResult<Vec<Node>> {
        let mut query = node::Entity::find();

        if let Some(mcc_id) = filter.mcc_id {
            query = query.filter(node::Column::MccId.eq(mcc_id));
        }
        if let Some(ref needle) = filter.slug_contains {
            debug!("Filtering nodes by slug containing {:?}", needle);
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(node::Column::Slug)))
                    .like(LikeExpr::new(like_pattern(needle)).escape('\\')),
            );
        }

        let models = query
            .order_by_asc(node::Column::Slug)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(from_model).collect()
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Node>> {
        node::Entity::find()
            .filter(node::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(from_model)
            .transpose()
    }

    async fn slug_taken(&self, slug: &str, exclude_id: Option<i32>) -> DomainResult<bool> {
        let mut query = node::Entity::find().filter(node::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(node::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.map_err(db_err)?;
        Ok(count > 0)
    }

    async fn label_in_use(&self, label: &str, exclude_id: Option<i32>) -> DomainResult<bool> {
        let mut query = node::Entity::find().filter(node::Column::Label.eq(label));
        if let Some(id) = exclude_id {
            query = query.filter(node::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.map_err(db_err)?;
        Ok(count > 0)
    }

    async fn save(&self, data: NodeData) -> DomainResult<Node> {
        let model = node::ActiveModel {
            title: Set(data.title),
            slug: Set(data.slug),
            label: Set(data.label),
            level: Set(data.level.to_string()),
            round_per_minute: Set(data.round_per_minute),
            power_tenths: Set(power_to_tenths(data.power)?),
            mcc_id: Set(data.mcc_id),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(db_err)?;
        info!("Node {}_{} saved (id={})", saved.title, saved.slug, saved.id);
        from_model(saved)
    }

    async fn update(&self, n: Node) -> DomainResult<Node> {
        let existing = node::Entity::find_by_id(n.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Node", "id", n.id))?;

        let mut active: node::ActiveModel = existing.into();
        active.title = Set(n.title);
        active.slug = Set(n.slug);
        active.label = Set(n.label);
        active.level = Set(n.level.to_string());
        active.round_per_minute = Set(n.round_per_minute);
        active.power_tenths = Set(power_to_tenths(n.power)?);
        active.mcc_id = Set(n.mcc_id);

        let saved = active.update(&self.db).await.map_err(db_err)?;
        info!("Node {} updated (slug={})", saved.id, saved.slug);
        from_model(saved)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = node::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Node", "id", id));
        }
        info!("Node {} deleted", id);
        Ok(())
    }
}
