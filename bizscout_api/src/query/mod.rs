mod common;
pub use self::common::{Query, QueryCommon};

mod organization;
pub use self::organization::OrganizationQuery;

mod profile;
pub use self::profile::{CompanyLookupQuery, StockProfileQuery};
