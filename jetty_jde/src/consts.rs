pub const AUTH_HEADER: &str = "jde-AIS-Auth";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const ACCEPT_HEADER: &str = "Accept";
pub const APPLICATION_JSON: &str = "application/json";

pub const API_ROOT: &str = "/jderest";
pub const API_ROOT_V2: &str = "/jderest/v2";

pub const TOKEN_REQUEST: &str = "tokenrequest";
pub const TOKEN_VALIDATE: &str = "tokenrequest/validate";
pub const DEFAULT_CONFIG: &str = "defaultconfig";
pub const DATA_SERVICE: &str = "dataservice";

/// Capabilities the connector can't work without.
pub const REQUIRED_CAPABILITIES: &str = "dataservice,outputType";
/// Capability that enables the dedicated token validation endpoint.
pub const VALIDATE_CAPABILITY: &str = "validate";

/// `maxPageSize` value that asks the server for every record at once.
pub const NO_MAX_PAGE_SIZE: &str = "No Max";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
