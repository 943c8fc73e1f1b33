//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::motor_control_center::MotorControlCenterRepository;
use crate::domain::node::NodeRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::substation::SubstationRepository;
use crate::domain::user::UserRepository;

use super::motor_control_center_repository::SeaOrmMotorControlCenterRepository;
use super::node_repository::SeaOrmNodeRepository;
use super::substation_repository::SeaOrmSubstationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let rooms = repos.mccs().find_by_substation(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    substations: SeaOrmSubstationRepository,
    mccs: SeaOrmMotorControlCenterRepository,
    nodes: SeaOrmNodeRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            substations: SeaOrmSubstationRepository::new(db.clone()),
            mccs: SeaOrmMotorControlCenterRepository::new(db.clone()),
            nodes: SeaOrmNodeRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn substations(&self) -> &dyn SubstationRepository {
        &self.substations
    }

    fn mccs(&self) -> &dyn MotorControlCenterRepository {
        &self.mccs
    }

    fn nodes(&self) -> &dyn NodeRepository {
        &self.nodes
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
