//! Locator service: browsing the substation → MCC → node hierarchy and
//! maintaining its records.
//!
//! Screen and API handlers stay thin and delegate here.

use std::sync::Arc;

use tracing::info;

use crate::application::forms::node_form::{
    check_power_digits, clean_slug, INVALID_REFERENCE, SLUG_TAKEN,
};
use crate::application::forms::NodeForm;
use crate::domain::motor_control_center::{MotorControlCenter, NewMotorControlCenter};
use crate::domain::node::{Node, NodeData, NodeFilter};
use crate::domain::substation::{NewSubstation, Substation};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::FieldErrors;

pub struct LocatorService {
    repos: Arc<dyn RepositoryProvider>,
}

impl LocatorService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Browsing ────────────────────────────────────────────────

    pub async fn substations(&self) -> DomainResult<Vec<Substation>> {
        self.repos.substations().find_all().await
    }

    /// Substation plus the MCCs it feeds.
    pub async fn substation_rooms(
        &self,
        id: i32,
    ) -> DomainResult<(Substation, Vec<MotorControlCenter>)> {
        let substation = self
            .repos
            .substations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Substation", "id", id))?;
        let rooms = self.repos.mccs().find_by_substation(id).await?;
        Ok((substation, rooms))
    }

    /// MCC plus its nodes.
    pub async fn mcc_nodes(&self, slug: &str) -> DomainResult<(MotorControlCenter, Vec<Node>)> {
        let mcc = self.mcc_by_slug(slug).await?;
        let nodes = self.repos.nodes().find(NodeFilter::for_mcc(mcc.id)).await?;
        Ok((mcc, nodes))
    }

    pub async fn node(&self, slug: &str) -> DomainResult<Node> {
        self.repos
            .nodes()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Node", "slug", slug))
    }

    pub async fn search_nodes(&self, filter: NodeFilter) -> DomainResult<Vec<Node>> {
        self.repos.nodes().find(filter).await
    }

    pub async fn mccs(&self) -> DomainResult<Vec<MotorControlCenter>> {
        self.repos.mccs().find_all().await
    }

    // ── Node maintenance (screens) ──────────────────────────────

    /// Create a node from a submitted form. Field problems come back as
    /// `DomainError::Invalid`.
    pub async fn create_node(&self, form: &NodeForm) -> DomainResult<Node> {
        let data = form
            .clean()
            .map_err(DomainError::Invalid)?
            .into_data(None);
        self.insert_node(data).await
    }

    pub async fn update_node(&self, slug: &str, form: &NodeForm) -> DomainResult<Node> {
        let existing = self.node(slug).await?;
        let data = form
            .clean()
            .map_err(DomainError::Invalid)?
            .into_data(existing.label.clone());
        self.replace_node(existing, data).await
    }

    /// Unconditional; returns the removed node.
    pub async fn delete_node(&self, slug: &str) -> DomainResult<Node> {
        let node = self.node(slug).await?;
        self.repos.nodes().delete(node.id).await?;
        info!(slug = %node.slug, "Node deleted");
        Ok(node)
    }

    /// Whether any stored node still points at `label`.
    pub async fn label_in_use(&self, label: &str) -> DomainResult<bool> {
        self.repos.nodes().label_in_use(label, None).await
    }

    // ── Node maintenance (typed input) ──────────────────────────

    pub async fn insert_node(&self, data: NodeData) -> DomainResult<Node> {
        self.check_node(&data, None).await?;
        let node = self.repos.nodes().save(data).await?;
        info!(slug = %node.slug, mcc_id = node.mcc_id, "Node created");
        Ok(node)
    }

    pub async fn replace_node(&self, existing: Node, data: NodeData) -> DomainResult<Node> {
        self.check_node(&data, Some(existing.id)).await?;
        let node = self.repos.nodes().update(data.into_node(existing.id)).await?;
        info!(slug = %node.slug, "Node updated");
        Ok(node)
    }

    pub async fn set_node_label(&self, slug: &str, label: Option<String>) -> DomainResult<Node> {
        let mut node = self.node(slug).await?;
        node.label = label;
        self.repos.nodes().update(node).await
    }

    /// Checks that need storage: slug uniqueness and the MCC reference.
    async fn check_node(&self, data: &NodeData, exclude_id: Option<i32>) -> DomainResult<()> {
        let mut errors = FieldErrors::new();
        if let Err(msg) = clean_slug(&data.slug) {
            errors.add("slug", msg);
        } else if self.repos.nodes().slug_taken(&data.slug, exclude_id).await? {
            errors.add("slug", SLUG_TAKEN);
        }
        if let Err(msg) = check_power_digits(data.power) {
            errors.add("power", msg);
        }
        if self.repos.mccs().find_by_id(data.mcc_id).await?.is_none() {
            errors.add("mcc", INVALID_REFERENCE);
        }
        errors.into_result().map_err(DomainError::Invalid)
    }

    // ── Back office: substations ────────────────────────────────

    pub async fn substations_by_name(&self) -> DomainResult<Vec<Substation>> {
        self.repos.substations().find_all_by_name().await
    }

    pub async fn substation(&self, id: i32) -> DomainResult<Substation> {
        self.repos
            .substations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Substation", "id", id))
    }

    pub async fn create_substation(&self, new: NewSubstation) -> DomainResult<Substation> {
        check_slug(&new.slug)?;
        let substation = self.repos.substations().save(new).await?;
        info!(id = substation.id, name = %substation.name, "Substation created");
        Ok(substation)
    }

    pub async fn update_substation(&self, substation: Substation) -> DomainResult<Substation> {
        check_slug(&substation.slug)?;
        self.repos.substations().update(substation).await
    }

    pub async fn delete_substation(&self, id: i32) -> DomainResult<()> {
        self.repos.substations().delete(id).await
    }

    // ── Back office: motor-control centers ──────────────────────

    pub async fn mcc(&self, id: i32) -> DomainResult<MotorControlCenter> {
        self.repos
            .mccs()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("MotorControlCenter", "id", id))
    }

    pub async fn mcc_by_slug(&self, slug: &str) -> DomainResult<MotorControlCenter> {
        self.repos
            .mccs()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("MotorControlCenter", "slug", slug))
    }

    pub async fn create_mcc(&self, new: NewMotorControlCenter) -> DomainResult<MotorControlCenter> {
        self.substation(new.substation_id)
            .await
            .map_err(substation_field_error)?;
        let mcc = self.repos.mccs().save(new).await?;
        info!(id = mcc.id, slug = %mcc.slug, "MCC created");
        Ok(mcc)
    }

    pub async fn update_mcc(&self, mcc: MotorControlCenter) -> DomainResult<MotorControlCenter> {
        self.substation(mcc.substation_id)
            .await
            .map_err(substation_field_error)?;
        self.repos.mccs().update(mcc).await
    }

    pub async fn delete_mcc(&self, id: i32) -> DomainResult<()> {
        self.repos.mccs().delete(id).await
    }
}

fn check_slug(slug: &str) -> DomainResult<()> {
    clean_slug(slug)
        .map(|_| ())
        .map_err(|msg| DomainError::Invalid(FieldErrors::single("slug", msg)))
}

fn substation_field_error(e: DomainError) -> DomainError {
    if e.is_not_found() {
        DomainError::Invalid(FieldErrors::single("substation_id", INVALID_REFERENCE))
    } else {
        e
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::choices::{Level, MccName, SubstationName};
    use crate::infrastructure::database::repositories::test_support::migrated_db;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn service() -> LocatorService {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(migrated_db().await));
        LocatorService::new(repos)
    }

    async fn seed(svc: &LocatorService) -> MotorControlCenter {
        let rp = svc
            .create_substation(NewSubstation {
                name: SubstationName::Rp4,
                slug: "rp-4".into(),
                level: Level::L48,
            })
            .await
            .unwrap();
        svc.create_mcc(NewMotorControlCenter {
            name: MccName::Mcc1,
            substation_id: rp.id,
        })
        .await
        .unwrap()
    }

    fn form(slug: &str, mcc: &MotorControlCenter) -> NodeForm {
        NodeForm {
            title: "Node 1".into(),
            slug: slug.into(),
            level: "4.8".into(),
            round_per_minute: "1000".into(),
            power: "7.5".into(),
            mcc: mcc.id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn hierarchy_browsing() {
        let svc = service().await;
        let mcc = seed(&svc).await;
        svc.create_node(&form("1_1", &mcc)).await.unwrap();

        let (substation, rooms) = svc.substation_rooms(mcc.substation_id).await.unwrap();
        assert_eq!(substation.name, SubstationName::Rp4);
        assert_eq!(rooms, vec![mcc.clone()]);

        let (found, nodes) = svc.mcc_nodes("mcc-1").await.unwrap();
        assert_eq!(found.id, mcc.id);
        assert_eq!(nodes.len(), 1);

        assert!(svc.substation_rooms(99).await.unwrap_err().is_not_found());
        assert!(svc.mcc_nodes("mcc-9").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_field_error() {
        let svc = service().await;
        let mcc = seed(&svc).await;
        svc.create_node(&form("1_1", &mcc)).await.unwrap();

        match svc.create_node(&form("1_1", &mcc)).await {
            Err(DomainError::Invalid(errors)) => assert_eq!(errors.get("slug"), [SLUG_TAKEN]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_mcc_is_a_field_error() {
        let svc = service().await;
        let mcc = seed(&svc).await;
        let mut f = form("1_1", &mcc);
        f.mcc = "999".into();
        match svc.create_node(&f).await {
            Err(DomainError::Invalid(errors)) => assert_eq!(errors.get("mcc"), [INVALID_REFERENCE]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_keeps_own_slug_and_label() {
        let svc = service().await;
        let mcc = seed(&svc).await;
        let mut f = form("1_1", &mcc);
        f.label = "photos/pump.png".into();
        svc.create_node(&f).await.unwrap();

        let mut edit = form("1_1", &mcc);
        edit.power = "12.5".into();
        let node = svc.update_node("1_1", &edit).await.unwrap();
        assert_eq!(node.power, Decimal::new(125, 1));
        assert_eq!(node.label.as_deref(), Some("photos/pump.png"));
    }

    #[tokio::test]
    async fn delete_then_missing() {
        let svc = service().await;
        let mcc = seed(&svc).await;
        svc.create_node(&form("1_1", &mcc)).await.unwrap();
        svc.delete_node("1_1").await.unwrap();
        assert!(svc.node("1_1").await.unwrap_err().is_not_found());
        assert!(svc.delete_node("1_1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn invalid_substation_slug() {
        let svc = service().await;
        let err = svc
            .create_substation(NewSubstation {
                name: SubstationName::Rp5,
                slug: "р п".into(),
                level: Level::Unspecified,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Invalid(ref e) if e.contains("slug")));
    }

    #[tokio::test]
    async fn mcc_requires_existing_substation() {
        let svc = service().await;
        let err = svc
            .create_mcc(NewMotorControlCenter {
                name: MccName::Mcc2,
                substation_id: 77,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Invalid(ref e) if e.contains("substation_id")));
    }
}
