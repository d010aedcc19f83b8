//! Line based console exposing the `ws2812` command
//!
//! ```text
//! ws2812 [--pos <pos>] <color>
//! ```

use std::io::{BufRead, ErrorKind, Write};
use std::time::Duration;

use crate::ws2812::{I2sWrite, Rgb, Strip, Transmitter, Ws2812Error};

pub const PROMPT: &str = "ws2812> ";
pub const MAX_ARGS: usize = 8;
const IDLE_POLL: Duration = Duration::from_millis(10);

pub type Args<'a> = heapless::Vec<&'a str, MAX_ARGS>;

struct CommandInfo {
    command: &'static str,
    hint: &'static str,
    help: &'static str,
}

const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        command: "ws2812",
        hint: "[--pos <pos>] <color>",
        help: "Set the ws2812 color\n  --pos <pos>  The position of the led. Default is 0\n  <color>      The color in hex format. Example: ff0000",
    },
    CommandInfo {
        command: "help",
        hint: "",
        help: "Print the list of registered commands",
    },
];

pub fn split_args(line: &str) -> Result<Args<'_>, Ws2812Error> {
    let mut args = Args::new();
    for arg in line.split_whitespace() {
        args.push(arg)
            .map_err(|_| Ws2812Error::Usage(format!("too many arguments (max {MAX_ARGS})")))?;
    }
    Ok(args)
}

/// Validated `ws2812` command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetColour {
    pub pos: usize,
    pub colour: Rgb,
}

impl SetColour {
    /// Parse the arguments following the command name for a strip of N LEDs
    pub fn parse<const N: usize>(args: &[&str]) -> Result<Self, Ws2812Error> {
        let mut pos: Option<&str> = None;
        let mut colour: Option<&str> = None;
        let mut iter = args.iter();
        while let Some(&arg) = iter.next() {
            if arg == "--pos" {
                let v = iter
                    .next()
                    .copied()
                    .ok_or_else(|| Ws2812Error::Usage("option \"--pos\" requires an argument".into()))?;
                pos = Some(v);
            } else if let Some(v) = arg.strip_prefix("--pos=") {
                pos = Some(v);
            } else if arg.starts_with("--") {
                return Err(Ws2812Error::Usage(format!("invalid option \"{arg}\"")));
            } else if colour.is_none() {
                colour = Some(arg);
            } else {
                return Err(Ws2812Error::Usage(format!("unexpected argument \"{arg}\"")));
            }
        }
        let colour = colour.ok_or_else(|| Ws2812Error::Usage("missing <color>".into()))?;

        let pos = match pos {
            Some(p) => {
                let p = p
                    .parse::<i64>()
                    .map_err(|_| Ws2812Error::Usage(format!("invalid argument \"{p}\" to --pos")))?;
                Strip::<N>::check_pos(p)?
            }
            None => 0,
        };
        let colour = Rgb::from_hex(colour)?;
        Ok(Self { pos, colour })
    }
}

/// Update a single pixel and refresh the strip
pub fn set_pixel<W: I2sWrite, const N: usize>(
    strip: &mut Strip<N>,
    tx: &mut Transmitter<W, N>,
    pos: usize,
    colour: Rgb,
) -> Result<(), Ws2812Error> {
    strip.set(pos, colour)?;
    log::info!("Set LED {pos}: {colour}");
    tx.update(strip.pixels())
}

pub struct Console<W, const N: usize> {
    strip: Strip<N>,
    tx: Transmitter<W, N>,
}

impl<W: I2sWrite, const N: usize> Console<W, N> {
    pub fn new(tx: Transmitter<W, N>) -> Self {
        Self {
            strip: Strip::new(),
            tx,
        }
    }

    pub fn strip(&self) -> &Strip<N> {
        &self.strip
    }

    pub fn transmitter(&self) -> &Transmitter<W, N> {
        &self.tx
    }

    /// Send the current strip state
    pub fn refresh(&mut self) -> Result<(), Ws2812Error> {
        self.tx.update(self.strip.pixels())
    }

    /// Run a single command line, returning its exit status
    ///
    /// Validation failures are reported on `out` and give status 1 with no
    /// side effects. Transmission faults are returned as errors.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<i32> {
        let args = match split_args(line) {
            Ok(args) => args,
            Err(e) => {
                log::warn!("{e}");
                writeln!(out, "{e}")?;
                return Ok(1);
            }
        };
        let Some((&command, args)) = args.split_first() else {
            return Ok(0);
        };
        match command {
            "ws2812" => self.ws2812(args, out),
            "help" => {
                print_help(out)?;
                Ok(0)
            }
            _ => {
                log::warn!("Unrecognized command: {command}");
                writeln!(out, "Unrecognized command")?;
                Ok(1)
            }
        }
    }

    fn ws2812(&mut self, args: &[&str], out: &mut impl Write) -> anyhow::Result<i32> {
        let cmd = match SetColour::parse::<N>(args) {
            Ok(cmd) => cmd,
            Err(e) => {
                log::warn!("{e}");
                writeln!(out, "ws2812: {e}")?;
                if matches!(e, Ws2812Error::Usage(_)) {
                    writeln!(out, "Usage: ws2812 {}", COMMANDS[0].hint)?;
                }
                return Ok(1);
            }
        };
        set_pixel(&mut self.strip, &mut self.tx, cmd.pos, cmd.colour)?;
        Ok(0)
    }

    /// Read commands from `input` until EOF
    ///
    /// The ESP-IDF UART console is non-blocking so `WouldBlock` just means
    /// no input yet. Bytes that are not UTF-8 are replaced and left for the
    /// command to reject.
    pub fn run(&mut self, mut input: impl BufRead, mut out: impl Write) -> anyhow::Result<()> {
        let mut buf: Vec<u8> = Vec::new();
        write!(out, "{PROMPT}")?;
        out.flush()?;
        loop {
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    // Unterminated last line
                    let line = String::from_utf8_lossy(&buf);
                    if !line.trim().is_empty() {
                        self.handle_line(line.trim_end(), &mut out)?;
                    }
                    return Ok(());
                }
                Ok(_) if buf.last() != Some(&b'\n') => continue,
                Ok(_) => {
                    let status = {
                        let line = String::from_utf8_lossy(&buf);
                        self.handle_line(line.trim_end(), &mut out)?
                    };
                    if status != 0 {
                        log::debug!("Command returned non-zero error code: {status}");
                    }
                    buf.clear();
                    write!(out, "{PROMPT}")?;
                    out.flush()?;
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::WouldBlock | ErrorKind::Interrupted | ErrorKind::TimedOut
                    ) =>
                {
                    std::thread::sleep(IDLE_POLL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

pub fn print_help(out: &mut impl Write) -> std::io::Result<()> {
    for c in COMMANDS {
        writeln!(out, "{} {}", c.command, c.hint)?;
        writeln!(out, "  {}\n", c.help)?;
    }
    Ok(())
}
