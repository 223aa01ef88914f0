//! Core type definitions for the application

use super::filters::ApplicationFilter;
use super::forms::{
    ApplicationDecision, ForgotPasswordForm, LoginForm, OtpForm, ProfileForm, ResetPasswordForm,
};

/// Every screen the client can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    /// Splash while the saved session is restored
    #[default]
    Loading,
    Login,
    ForgotPassword,
    VerifyOtp,
    ResetPassword,
    Home,
    AdminDashboard,
    ArtistApplications,
    Settings,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Loading => "Loading",
            Screen::Login => "Log in",
            Screen::ForgotPassword => "Reset your password",
            Screen::VerifyOtp => "Verify code",
            Screen::ResetPassword => "Choose a new password",
            Screen::Home => "Home",
            Screen::AdminDashboard => "Dashboard",
            Screen::ArtistApplications => "Artist Applications",
            Screen::Settings => "Settings",
        }
    }

    pub fn is_auth_flow(self) -> bool {
        matches!(
            self,
            Screen::Login | Screen::ForgotPassword | Screen::VerifyOtp | Screen::ResetPassword
        )
    }

    pub fn requires_admin(self) -> bool {
        matches!(self, Screen::AdminDashboard | Screen::ArtistApplications)
    }

    pub fn requires_auth(self) -> bool {
        matches!(self, Screen::Settings) || self.requires_admin()
    }

    /// Sidebar navigation entries visible for the given roles
    pub fn sidebar_entries(is_authenticated: bool, is_admin: bool) -> Vec<Screen> {
        let mut entries = vec![Screen::Home];
        if is_admin {
            entries.push(Screen::AdminDashboard);
            entries.push(Screen::ArtistApplications);
        }
        if is_authenticated {
            entries.push(Screen::Settings);
        }
        entries
    }
}

/// Which panel of the main layout has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    Sidebar,
    #[default]
    MainContent,
}

impl ActiveSection {
    pub fn toggle(self) -> Self {
        match self {
            ActiveSection::Sidebar => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Sidebar,
        }
    }
}

/// Overlays on the artist applications screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialog {
    Details,
    Approve,
    Reject,
    FilterMenu,
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub screen: Screen,
    pub active_section: ActiveSection,
    pub sidebar_selected: usize,
    /// Cursor in the main list of the current screen
    pub main_selected: usize,
    pub show_help_popup: bool,

    pub login: LoginForm,
    pub forgot_password: ForgotPasswordForm,
    pub otp: OtpForm,
    pub reset_password: ResetPasswordForm,

    pub filter: ApplicationFilter,
    /// Search box on the applications screen is taking input
    pub search_editing: bool,
    pub dialog: Option<Dialog>,
    /// Application the open dialog refers to
    pub selected_application: Option<String>,
    pub decision: ApplicationDecision,

    pub profile: ProfileForm,
    pub profile_editing: bool,
}
