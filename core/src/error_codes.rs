//! Stable error code strings surfaced in error messages and by `code()`
//! accessors on the error enums.

pub const INPUT_NO_FILE: &str = "SHRECON_INPUT_001";
pub const INPUT_MALFORMED: &str = "SHRECON_INPUT_002";
pub const INPUT_IO: &str = "SHRECON_INPUT_003";

pub const KEY_MISSING_COLUMN: &str = "SHRECON_KEY_001";

pub const CONTAINER_IO: &str = "SHRECON_CONTAINER_001";
pub const CONTAINER_NOT_ZIP: &str = "SHRECON_CONTAINER_002";
pub const CONTAINER_NOT_OPC: &str = "SHRECON_CONTAINER_003";
pub const CONTAINER_TOO_MANY_ENTRIES: &str = "SHRECON_CONTAINER_004";
pub const CONTAINER_PART_TOO_LARGE: &str = "SHRECON_CONTAINER_005";
pub const CONTAINER_TOTAL_TOO_LARGE: &str = "SHRECON_CONTAINER_006";
pub const CONTAINER_READ: &str = "SHRECON_CONTAINER_007";

pub const PARSE_XML: &str = "SHRECON_PARSE_001";
pub const PARSE_ADDRESS: &str = "SHRECON_PARSE_002";
pub const PARSE_SHARED_STRING: &str = "SHRECON_PARSE_003";

pub const ANNOTATE_WRITE: &str = "SHRECON_ANNOTATE_001";

pub const SINK: &str = "SHRECON_SINK_001";
