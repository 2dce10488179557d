use anyhow::{bail, Context, Result};
use cam_controller::{Controller, HostConfig, Order, Parameters};
#[cfg(feature = "lights")]
use cam_controller::BallMovement;
use strum::IntoEnumIterator;

const USAGE: &str = "usage: cam_controller [config.json] <command>

commands:
  list-orders         list the order codes of this build
  params              show the device parameter table
  hello               connect to the Arduino
  start-cam           connect and start camera triggering
  trigger             connect, configure FPS/exposure and start the camera
  left <on|off>       switch the left light
  right <on|off>      switch the right light
  indicate <0-3>      show a ball movement on the lights";

#[cfg(feature = "lights")]
fn parse_switch(arg: Option<&str>) -> Result<bool> {
    match arg {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        other => bail!("expected on|off, got {:?}", other),
    }
}

/// Splits off a leading `*.json` argument as the config file path.
fn split_config_arg(mut args: Vec<String>) -> (Option<String>, Vec<String>) {
    if args.first().is_some_and(|a| a.ends_with(".json")) {
        let path = args.remove(0);
        (Some(path), args)
    } else {
        (None, args)
    }
}

async fn connected(config: HostConfig) -> Result<Controller> {
    let mut controller = Controller::new(config).context("Failed to open serial port")?;
    controller.connect().await.context("Connection with Arduino failed")?;
    Ok(controller)
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config_path, args) = split_config_arg(std::env::args().skip(1).collect());
    let config = match config_path {
        Some(path) => HostConfig::load(&path).map_err(|e| anyhow::anyhow!(e))?,
        None => HostConfig::default(),
    };

    let command = args.first().map(String::as_str);
    #[cfg_attr(not(feature = "lights"), allow(unused_variables))]
    let arg = args.get(1).map(String::as_str);

    match command {
        Some("list-orders") => {
            for order in Order::iter() {
                println!("{:>3}  {}", order.code(), order.name());
            }
        }
        Some("params") => {
            let params = Parameters::DEFAULT;
            println!("SERIAL_BAUD     {}", params.serial_baud);
            println!("LED_PIN         {}", params.led_pin);
            println!("CAM_PIN         {}", params.cam_pin);
            println!("LEFT_LIGHT_PIN  {}", params.left_light_pin);
            println!("RIGHT_LIGHT_PIN {}", params.right_light_pin);
            println!("DEBUG           {}", params.debug);
        }
        Some("hello") => {
            connected(config).await?;
        }
        Some("start-cam") => {
            connected(config).await?.start_cam().await?;
        }
        #[cfg(feature = "hardware-trigger")]
        Some("trigger") => {
            connected(config).await?.configure_hardware_trigger().await?;
        }
        #[cfg(feature = "lights")]
        Some("left") => {
            let on = parse_switch(arg)?;
            connected(config).await?.switch_left_light(on).await?;
        }
        #[cfg(feature = "lights")]
        Some("right") => {
            let on = parse_switch(arg)?;
            connected(config).await?.switch_right_light(on).await?;
        }
        #[cfg(feature = "lights")]
        Some("indicate") => {
            let code: u8 = arg.context("indicate needs a movement code")?.parse()?;
            let movement = BallMovement::try_from(code)?;
            connected(config).await?.indicate(movement).await?;
            println!("Lights set for {:?}", movement);
        }
        Some(other) => bail!("unknown or disabled command {:?}\n\n{}", other, USAGE),
        None => println!("{}", USAGE),
    }

    Ok(())
}
