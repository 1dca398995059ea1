pub(crate) mod authenticated_user;

type RejectionType = crate::Error;
