pub mod path_queries;

pub mod endpoints {
    pub const GET_DASHBOARD: &str = "/";
    pub const GET_HEALTH: &str = "/health";
}
