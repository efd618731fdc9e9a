//! Permission catalog seeded into `permisos`.
//!
//! The application crate mirrors these keys in its `Permission` enum; the
//! seed migration is the source of truth for what exists in the database.

/// (clave, descripcion) pairs
pub const PERMISSION_CATALOG: &[(&str, &str)] = &[
    ("ordenes.crear", "Crear y enviar órdenes de compra propias"),
    ("ordenes.aprobar", "Aprobar o rechazar órdenes en revisión"),
    ("ordenes.cerrar", "Cerrar órdenes con cierre solicitado"),
    ("ordenes.ver_todas", "Consultar órdenes de cualquier solicitante"),
    ("presupuesto.administrar", "Administrar códigos presupuestales"),
    ("catalogos.administrar", "Administrar áreas, proveedores y productos"),
    ("usuarios.administrar", "Administrar usuarios, roles y permisos"),
];
