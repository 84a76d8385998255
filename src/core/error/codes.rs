use super::ErrorCode;

pub fn all_codes() -> &'static [ErrorCode] {
    &[
        ErrorCode::ValidationMissingArgument,
        ErrorCode::ValidationInvalidArgument,
        ErrorCode::ValidationUnknownErrorCode,
        ErrorCode::RecipeInvalidJson,
        ErrorCode::RecipeUnknownAction,
        ErrorCode::RecipeUnknownHandler,
        ErrorCode::ActionMissingOption,
        ErrorCode::ActionInvalidOption,
        ErrorCode::ActionFailed,
        ErrorCode::NodeInvalidTransition,
        ErrorCode::NodeChildAfterTerminal,
        ErrorCode::ExecutorCommandFailed,
        ErrorCode::ExecutorCommandTimeout,
        ErrorCode::ExecutorOutputUnparseable,
        ErrorCode::ExecutorApiFailed,
        ErrorCode::OrgNotFound,
        ErrorCode::ConfigFileNotFound,
        ErrorCode::ConfigInvalidJson,
        ErrorCode::InternalIoError,
        ErrorCode::InternalJsonError,
        ErrorCode::InternalUnexpected,
    ]
}

pub fn parse_code(code: &str) -> Option<ErrorCode> {
    all_codes()
        .iter()
        .copied()
        .find(|candidate| candidate.as_str() == code)
}
