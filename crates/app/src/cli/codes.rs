use clap::Args;
use reservations_app::{
    context::AppContext,
    domain::{
        accounts::records::{AccountId, Principal},
        two_factor::OneTimeCodeError,
    },
};

use super::{CommandError, describe};

#[derive(Debug, Args)]
pub(crate) struct IssueCodeArgs {
    /// Account identifier
    #[arg(long)]
    account: i64,

    /// Phone number the code is sent to
    #[arg(long)]
    to: String,
}

#[derive(Debug, Args)]
pub(crate) struct ValidateCodeArgs {
    /// Account identifier; omit to validate as an anonymous caller
    #[arg(long)]
    account: Option<i64>,

    /// Code as entered by the user
    #[arg(long)]
    code: String,
}

fn command_error(action: &str, error: &OneTimeCodeError) -> CommandError {
    if error.is_misconfiguration() {
        return CommandError::Misconfigured(describe(error));
    }

    CommandError::from_service(action, error.is_client_error(), error)
}

pub(crate) async fn issue(context: &AppContext, args: IssueCodeArgs) -> Result<(), CommandError> {
    let account = AccountId::from_i64(args.account);

    context
        .two_factor
        .issue(account, &args.to)
        .await
        .map_err(|error| command_error("issue code", &error))?;

    println!("code sent to account #{account}");

    Ok(())
}

pub(crate) async fn validate(
    context: &AppContext,
    args: ValidateCodeArgs,
) -> Result<(), CommandError> {
    let principal = args
        .account
        .map_or(Principal::Anonymous, |id| AccountId::from_i64(id).into());

    let valid = context
        .two_factor
        .validate(principal, args.code.trim())
        .await
        .map_err(|error| command_error("validate code", &error))?;

    println!("principal: {principal}");
    println!("valid: {valid}");

    Ok(())
}
