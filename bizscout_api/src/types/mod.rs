mod meta;
pub use self::meta::{Pagination, Response};

mod apollo;
pub use self::apollo::{ApolloContact, Organization, OrganizationResponse, OrganizationSearchResponse};

mod linkedin;
pub use self::linkedin::{CompanyDetails, CompanyLocation};

mod yahoo;
pub use self::yahoo::{CompanyOfficer, QuoteSummary, QuoteSummaryResponse, QuoteSummaryResult, SummaryProfile};
