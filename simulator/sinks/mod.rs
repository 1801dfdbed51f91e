//! Event sinks for tracing a single run

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bn_rust::{Event, EventSink, Step};

// ============================================================================
// Console Logging Sink
// ============================================================================

/// Prints events to the console; thread ties only when `verbose`
pub struct ConsoleEventSink {
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl EventSink for ConsoleEventSink {
    fn log(&mut self, step: Step, event: Event) {
        match event {
            Event::ThreadTied { a, b, merged } => {
                if self.verbose {
                    println!(
                        "{:>5} ThreadTied       {:>6} <-> {:<6} {}",
                        step,
                        a,
                        b,
                        if merged { "✓" } else { "·" }
                    );
                }
            }
            Event::ClustersMerged { root, size } => {
                if self.verbose {
                    println!("{:>5} ClustersMerged   root:{} size:{}", step, root, size);
                }
            }
            Event::StepCompleted {
                threads,
                largest_cluster,
            } => {
                println!(
                    "{:>5} StepCompleted    threads:{} largest:{}",
                    step, threads, largest_cluster
                );
            }
        }
    }
}

// ============================================================================
// CSV Event Sink
// ============================================================================

/// CSV event sink for structured data export
pub struct CsvEventSink {
    writer: BufWriter<File>,
}

impl CsvEventSink {
    pub fn new<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "step,event_type,value1,value2,value3")?;

        Ok(Self { writer })
    }
}

impl EventSink for CsvEventSink {
    fn log(&mut self, step: Step, event: Event) {
        let result = match event {
            Event::ThreadTied { a, b, merged } => writeln!(
                self.writer,
                "{},ThreadTied,{},{},{}",
                step, a, b, merged as u8
            ),
            Event::ClustersMerged { root, size } => {
                writeln!(self.writer, "{},ClustersMerged,{},{},0", step, root, size)
            }
            Event::StepCompleted {
                threads,
                largest_cluster,
            } => writeln!(
                self.writer,
                "{},StepCompleted,{},{},0",
                step, threads, largest_cluster
            ),
        };

        if let Err(e) = result {
            eprintln!("Error writing to CSV: {}", e);
        }
    }
}

impl Drop for CsvEventSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
