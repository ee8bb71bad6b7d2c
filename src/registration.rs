//! Startup registration with the BLE host.
//!
//! Order: adapter settings, GATT application, advertisement, then the
//! pairing agent (register, then request default). The first refusal stops
//! the sequence; there are no retries.

use crate::advertisement::Advertisement;
use crate::agent::{IoCapability, NoInputNoOutputAgent};
use crate::config::{AdapterConfig, REQUIRE_AUTHENTICATION, REQUIRE_AUTHORIZATION};
use crate::error::{Error, RegistrationStage};
use crate::gatt::GattApplication;

/// Options passed with the GATT application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ApplicationOptions {
    pub require_authentication: bool,
    pub require_authorization: bool,
}

impl Default for ApplicationOptions {
    fn default() -> Self {
        Self {
            require_authentication: REQUIRE_AUTHENTICATION,
            require_authorization: REQUIRE_AUTHORIZATION,
        }
    }
}

/// A host error that can be written to the log.
#[cfg(feature = "defmt")]
pub trait HostFault: defmt::Format {}
#[cfg(feature = "defmt")]
impl<T: defmt::Format> HostFault for T {}

/// A host error that can be written to the log.
#[cfg(not(feature = "defmt"))]
pub trait HostFault: core::fmt::Debug {}
#[cfg(not(feature = "defmt"))]
impl<T: core::fmt::Debug> HostFault for T {}

/// The BLE host stack as seen from the application.
pub trait BluetoothHost {
    /// Logged together with the failing stage.
    type Error: HostFault;

    fn configure_adapter(&mut self, config: &AdapterConfig) -> Result<(), Self::Error>;

    fn register_application(
        &mut self,
        app: &GattApplication,
        options: &ApplicationOptions,
    ) -> Result<(), Self::Error>;

    fn register_advertisement(&mut self, advertisement: &Advertisement) -> Result<(), Self::Error>;

    fn register_agent(
        &mut self,
        agent: &NoInputNoOutputAgent,
        capability: IoCapability,
    ) -> Result<(), Self::Error>;

    fn request_default_agent(&mut self, agent: &NoInputNoOutputAgent) -> Result<(), Self::Error>;
}

/// Everything the host needs to make the joystick visible.
pub struct Registration<'a> {
    pub adapter: &'a AdapterConfig,
    pub application: &'a GattApplication,
    pub advertisement: &'a Advertisement,
    pub agent: &'a NoInputNoOutputAgent,
}

impl Registration<'_> {
    /// Run the startup sequence against `host`.
    pub fn register<H: BluetoothHost>(&self, host: &mut H) -> Result<(), Error> {
        host.configure_adapter(self.adapter)
            .map_err(|e| fail(RegistrationStage::Adapter, e))?;
        info!("adapter configured as {}", self.adapter.alias);

        host.register_application(self.application, &ApplicationOptions::default())
            .map_err(|e| fail(RegistrationStage::Application, e))?;
        info!(
            "GATT application registered at {}",
            self.application.root_path().as_str()
        );

        host.register_advertisement(self.advertisement)
            .map_err(|e| fail(RegistrationStage::Advertisement, e))?;
        info!("advertisement registered");

        host.register_agent(self.agent, self.agent.capability())
            .and_then(|()| host.request_default_agent(self.agent))
            .map_err(|e| fail(RegistrationStage::Agent, e))?;
        info!("{} agent registered", self.agent.capability().name());

        Ok(())
    }
}

fn fail<E: HostFault>(stage: RegistrationStage, cause: E) -> Error {
    error!("registration failed at {}: {}", stage, cause);
    Error::Registration(stage)
}
