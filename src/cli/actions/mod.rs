pub mod login;
pub mod register;

mod report;
mod run;
mod services;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Register(register::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the workflow does not complete.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
