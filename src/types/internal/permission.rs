use std::fmt;

/// Permission keys checked by the coordinators
///
/// Keys match the rows seeded into `permisos` by the migration crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    OrdersCreate,
    OrdersApprove,
    OrdersClose,
    OrdersViewAll,
    BudgetAdmin,
    CatalogAdmin,
    UsersAdmin,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::OrdersCreate,
        Permission::OrdersApprove,
        Permission::OrdersClose,
        Permission::OrdersViewAll,
        Permission::BudgetAdmin,
        Permission::CatalogAdmin,
        Permission::UsersAdmin,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::OrdersCreate => "ordenes.crear",
            Self::OrdersApprove => "ordenes.aprobar",
            Self::OrdersClose => "ordenes.cerrar",
            Self::OrdersViewAll => "ordenes.ver_todas",
            Self::BudgetAdmin => "presupuesto.administrar",
            Self::CatalogAdmin => "catalogos.administrar",
            Self::UsersAdmin => "usuarios.administrar",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::permissions::PERMISSION_CATALOG;

    #[test]
    fn test_every_permission_is_seeded() {
        for permission in Permission::ALL {
            assert!(
                PERMISSION_CATALOG.iter().any(|(clave, _)| *clave == permission.key()),
                "{} missing from seed catalog",
                permission
            );
        }
    }

    #[test]
    fn test_from_key_round_trips() {
        assert_eq!(Permission::from_key("ordenes.aprobar"), Some(Permission::OrdersApprove));
        assert_eq!(Permission::from_key("ordenes.borrar"), None);
    }
}
