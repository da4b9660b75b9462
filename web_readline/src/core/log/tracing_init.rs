// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, WriterConfig, rolling_file_appender_impl};
use miette::IntoDiagnostic;
use tracing::subscriber::DefaultGuard;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

impl TracingConfig {
    /// Install the layers as the global default subscriber. This can only happen once
    /// per process.
    ///
    /// # Errors
    ///
    /// Returns an error if the file layer can't be created, or if a global subscriber
    /// has already been installed.
    pub fn install_global(self) -> miette::Result<()> {
        let layers = try_create_layers(self)?;
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .into_diagnostic()
    }

    /// Install the layers for the current thread only, until the returned guard is
    /// dropped. Handy in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the file layer can't be created.
    pub fn install_thread_local(self) -> miette::Result<DefaultGuard> {
        let layers = try_create_layers(self)?;
        let subscriber = tracing_subscriber::registry().with(layers);
        Ok(tracing::subscriber::set_default(subscriber))
    }
}

/// Returns the layers. This does not initialize the tracing system. See
/// [`TracingConfig::install_global`] and [`TracingConfig::install_thread_local`].
///
/// # Errors
///
/// Returns an error if the file layer can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Vec<Box<DynLayer<tracing_subscriber::Registry>>>> {
    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    // Set the level filter for all the layers that follow.
    return_it.push(Box::new(tracing_config.get_level_filter()));

    if let Some(layer) = try_create_display_layer(
        tracing_config.get_level_filter(),
        tracing_config.get_writer_config(),
    ) {
        return_it.push(layer);
    }

    if let Some(layer) = try_create_file_layer(
        tracing_config.get_level_filter(),
        tracing_config.get_writer_config(),
    )? {
        return_it.push(layer);
    }

    Ok(return_it)
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// This is useful for composition of layers. There's more info in the docs
/// [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/index.html#runtime-configuration-with-layers).
#[must_use]
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();

    match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
        },
        WriterConfig::File(_) | WriterConfig::None => None,
    }
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Returns an error if the log file appender can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!().with_ansi(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, tracing_log_file_path)
        | WriterConfig::File(tracing_log_file_path) => {
            let file =
                rolling_file_appender_impl::try_create(tracing_log_file_path.as_str())?;
            Some(Box::new(
                fmt_layer.with_writer(file).with_filter(level_filter),
            ))
        }
        WriterConfig::Display(_) | WriterConfig::None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_fixtures::TempDir;

    #[test]
    fn test_try_create_display_layer() {
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(
                LevelFilter::DEBUG,
                WriterConfig::Display(DisplayPreference::Stdout),
            );
        assert!(layer.is_some());
    }

    #[test]
    fn test_no_display_layer_for_file_only() {
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(
                LevelFilter::DEBUG,
                WriterConfig::File("unused.log".into()),
            );
        assert!(layer.is_none());
    }

    #[test]
    fn test_try_create_both_layers() {
        let dir = TempDir::try_new().unwrap();
        let file_path = dir.join("web_readline.log");
        let file_path = file_path.to_str().unwrap().to_string();

        let tracing_config =
            TracingConfig::new_file_and_display(file_path.clone(), LevelFilter::DEBUG);

        let layers = try_create_layers(tracing_config).unwrap();
        // Level filter, display, file.
        assert_eq!(layers.len(), 3);
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_install_thread_local_default_config() {
        let guard = TracingConfig::default().install_thread_local().unwrap();
        tracing::warn!(message = "logged to stderr");
        drop(guard);
    }
}
