use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::BudgetError;
use crate::stores::unix_now;
use crate::types::db::budget_code;

#[derive(Debug, Clone)]
pub struct NewBudgetCode {
    pub codigo: String,
    pub nombre: String,
    pub area_id: Option<String>,
    pub monto_presupuesto: i64,
    pub vigencia_inicio: i64,
    pub vigencia_fin: i64,
}

/// Partial update; a new `monto_presupuesto` moves `monto_disponible` by the same delta
#[derive(Debug, Clone, Default)]
pub struct BudgetCodeChanges {
    pub nombre: Option<String>,
    pub area_id: Option<Option<String>>,
    pub monto_presupuesto: Option<i64>,
    pub vigencia_inicio: Option<i64>,
    pub vigencia_fin: Option<i64>,
}

/// Data access for `codigos_presupuestales`
#[derive(Debug, Default)]
pub struct BudgetCodeStore;

impl BudgetCodeStore {
    /// Create a new BudgetCodeStore
    pub fn new() -> Self {
        Self
    }

    /// Insert a budget code whose available amount starts at the full budget
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `new_code` - Validated fields; `codigo` is expected uppercased
    ///
    /// # Returns
    /// * `Ok(budget_code::Model)` - The stored code
    /// * `Err(InternalError)` - `BudgetError::DuplicateCode` if `codigo` exists, or a database error
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        new_code: NewBudgetCode,
    ) -> Result<budget_code::Model, InternalError> {
        let existing = budget_code::Entity::find()
            .filter(budget_code::Column::Codigo.eq(new_code.codigo.as_str()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_budget_code_by_codigo", e))?;
        if existing.is_some() {
            return Err(BudgetError::DuplicateCode {
                codigo: new_code.codigo,
            }
            .into());
        }

        let now = unix_now();
        budget_code::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            codigo: Set(new_code.codigo),
            nombre: Set(new_code.nombre),
            area_id: Set(new_code.area_id),
            monto_presupuesto: Set(new_code.monto_presupuesto),
            monto_disponible: Set(new_code.monto_presupuesto),
            vigencia_inicio: Set(new_code.vigencia_inicio),
            vigencia_fin: Set(new_code.vigencia_fin),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_budget_code", e))
    }

    /// Look up a code by id, `None` when absent
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        cp_id: &str,
    ) -> Result<Option<budget_code::Model>, InternalError> {
        budget_code::Entity::find_by_id(cp_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_budget_code", e))
    }

    /// Like `find_by_id`, but a missing code is `BudgetError::NotFound`
    pub async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        cp_id: &str,
    ) -> Result<budget_code::Model, InternalError> {
        self.find_by_id(conn, cp_id).await?.ok_or_else(|| {
            BudgetError::NotFound {
                cp_id: cp_id.to_string(),
            }
            .into()
        })
    }

    /// All codes, or only those in `ids` when given
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: Option<Vec<String>>,
        area_id: Option<&str>,
    ) -> Result<Vec<budget_code::Model>, InternalError> {
        let mut query = budget_code::Entity::find().order_by_asc(budget_code::Column::Codigo);
        if let Some(ids) = ids {
            if ids.is_empty() {
                return Ok(vec![]);
            }
            query = query.filter(budget_code::Column::Id.is_in(ids));
        }
        if let Some(area_id) = area_id {
            query = query.filter(budget_code::Column::AreaId.eq(area_id));
        }

        query
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_budget_codes", e))
    }

    /// Apply a partial update to `current`
    ///
    /// A new `monto_presupuesto` shifts `monto_disponible` by the same delta, so
    /// the committed amount (`presupuesto - disponible`) never changes here.
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `current` - The row as read inside the same transaction
    /// * `changes` - Fields to overwrite; `None` keeps the stored value
    ///
    /// # Returns
    /// * `Ok(budget_code::Model)` - The updated row
    /// * `Err(InternalError)` - `BudgetError::BelowCommitted` when the new budget
    ///   would leave `monto_disponible` negative, or a database error
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: budget_code::Model,
        changes: BudgetCodeChanges,
    ) -> Result<budget_code::Model, InternalError> {
        let cp_id = current.id.clone();
        let disponible = match changes.monto_presupuesto {
            Some(presupuesto) => {
                let delta = presupuesto - current.monto_presupuesto;
                let disponible = current.monto_disponible + delta;
                if disponible < 0 {
                    return Err(BudgetError::BelowCommitted {
                        cp_id,
                        committed: current.monto_comprometido(),
                    }
                    .into());
                }
                Some(disponible)
            }
            None => None,
        };

        let mut active = current.into_active_model();
        if let Some(nombre) = changes.nombre {
            active.nombre = Set(nombre);
        }
        if let Some(area_id) = changes.area_id {
            active.area_id = Set(area_id);
        }
        if let (Some(presupuesto), Some(disponible)) = (changes.monto_presupuesto, disponible) {
            active.monto_presupuesto = Set(presupuesto);
            active.monto_disponible = Set(disponible);
        }
        if let Some(inicio) = changes.vigencia_inicio {
            active.vigencia_inicio = Set(inicio);
        }
        if let Some(fin) = changes.vigencia_fin {
            active.vigencia_fin = Set(fin);
        }
        active.updated_at = Set(unix_now());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_budget_code", e))
    }

    /// Hard delete; callers check for orders first
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, cp_id: &str) -> Result<(), InternalError> {
        budget_code::Entity::delete_by_id(cp_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_budget_code", e))?;
        Ok(())
    }

    /// Subtract `monto` from the available balance only if it covers it
    ///
    /// The check and the subtraction are one conditional UPDATE, so two
    /// approvals racing for the same balance cannot both succeed.
    ///
    /// # Arguments
    /// * `conn` - The approving transaction
    /// * `cp_id` - Budget code to charge
    /// * `monto` - Order total, in centavos
    ///
    /// # Returns
    /// * `Ok(true)` - The balance covered `monto` and was reduced
    /// * `Ok(false)` - Insufficient balance (or unknown code); nothing changed
    /// * `Err(InternalError)` - Database error
    pub async fn debit<C: ConnectionTrait>(
        &self,
        conn: &C,
        cp_id: &str,
        monto: i64,
    ) -> Result<bool, InternalError> {
        let result = budget_code::Entity::update_many()
            .col_expr(
                budget_code::Column::MontoDisponible,
                Expr::col(budget_code::Column::MontoDisponible).sub(monto),
            )
            .col_expr(budget_code::Column::UpdatedAt, Expr::value(unix_now()))
            .filter(budget_code::Column::Id.eq(cp_id))
            .filter(budget_code::Column::MontoDisponible.gte(monto))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("debit_budget_code", e))?;

        Ok(result.rows_affected == 1)
    }

    /// Number of codes that belong to `area_id`
    pub async fn count_in_area<C: ConnectionTrait>(
        &self,
        conn: &C,
        area_id: &str,
    ) -> Result<u64, InternalError> {
        budget_code::Entity::find()
            .filter(budget_code::Column::AreaId.eq(area_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_budget_codes_in_area", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_budget_code, setup_test_databases};

    #[tokio::test]
    async fn test_disponible_starts_at_presupuesto() {
        let (db, _audit_db) = setup_test_databases().await;
        let cp = insert_budget_code(&db, "CP-001", 50_000).await;

        assert_eq!(cp.monto_disponible, 50_000);
        assert_eq!(cp.monto_comprometido(), 0);
    }

    #[tokio::test]
    async fn test_debit_is_conditional_on_balance() {
        let (db, _audit_db) = setup_test_databases().await;
        let store = BudgetCodeStore::new();
        let cp = insert_budget_code(&db, "CP-002", 10_000).await;

        assert!(store.debit(&db, &cp.id, 7_000).await.unwrap());
        assert!(!store.debit(&db, &cp.id, 3_001).await.unwrap());
        assert!(store.debit(&db, &cp.id, 3_000).await.unwrap());

        let cp = store.get(&db, &cp.id).await.unwrap();
        assert_eq!(cp.monto_disponible, 0);
    }

    #[tokio::test]
    async fn test_presupuesto_change_moves_disponible() {
        let (db, _audit_db) = setup_test_databases().await;
        let store = BudgetCodeStore::new();
        let cp = insert_budget_code(&db, "CP-003", 10_000).await;
        store.debit(&db, &cp.id, 6_000).await.unwrap();
        let cp = store.get(&db, &cp.id).await.unwrap();

        let raised = store
            .update(
                &db,
                cp,
                BudgetCodeChanges {
                    monto_presupuesto: Some(12_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(raised.monto_disponible, 6_000);

        let result = store
            .update(
                &db,
                raised,
                BudgetCodeChanges {
                    monto_presupuesto: Some(5_000),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(InternalError::Budget(BudgetError::BelowCommitted { committed: 6_000, .. }))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_codigo_is_rejected() {
        let (db, _audit_db) = setup_test_databases().await;
        insert_budget_code(&db, "CP-004", 1_000).await;

        let result = BudgetCodeStore::new()
            .create(
                &db,
                NewBudgetCode {
                    codigo: "CP-004".to_string(),
                    nombre: "Otro".to_string(),
                    area_id: None,
                    monto_presupuesto: 1,
                    vigencia_inicio: 0,
                    vigencia_fin: 1,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(InternalError::Budget(BudgetError::DuplicateCode { .. }))
        ));
    }
}
