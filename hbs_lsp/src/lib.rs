//! Language server for [hbs](https://github.com/ifiokjr/hbs).
//!
//! Every open or changed document is scanned with [`hbs_core::scan`] and the
//! resulting buckets are pushed to the client through the custom
//! `handlebars/decorations` notification. Partial lookups run on demand for
//! definitions, document links and hovers.

use std::collections::HashMap;
use std::path::PathBuf;

use hbs_core::Action;
use hbs_core::CreatedPartial;
use hbs_core::DecorationBucket;
use hbs_core::Decorations;
use hbs_core::HbsConfig;
use hbs_core::HbsError;
use hbs_core::HbsResult;
use hbs_core::LineTable;
use hbs_core::OPEN_PARTIAL_COMMAND;
use hbs_core::PartialResolver;
use hbs_core::Point;
use hbs_core::comment;
use hbs_core::config::CONFIG_FILE_CANDIDATES;
use hbs_core::create_partial;
use hbs_core::partial_name_at;
use hbs_core::scan;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp_server::Client;
use tower_lsp_server::LanguageServer;
use tower_lsp_server::jsonrpc::Error as RpcError;
use tower_lsp_server::jsonrpc::Result as LspResult;
use tower_lsp_server::ls_types::*;
use tracing_subscriber::EnvFilter;

/// Method name of the decorations notification.
pub const DECORATIONS_METHOD: &str = "handlebars/decorations";
/// Extract the selection into a new partial. Arguments: `[uri, range, name]`.
pub const CREATE_PARTIAL_COMMAND: &str = "handlebars.createPartial";
/// Toggle comment wrapping of the selection. Arguments: `[uri, range]`.
pub const TOGGLE_COMMENT_COMMAND: &str = "handlebars.toggleComment";

/// Params of the `handlebars/decorations` notification. Each bucket replaces
/// the previous bucket of the same category for `uri`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationsParams {
	pub uri: Uri,
	pub buckets: Vec<DecorationBucket>,
}

/// Server to client notification carrying a document's decorations.
#[derive(Debug)]
pub enum PublishDecorations {}

impl notification::Notification for PublishDecorations {
	type Params = DecorationsParams;

	const METHOD: &'static str = DECORATIONS_METHOD;
}

/// State for a single open document.
#[derive(Debug, Clone)]
struct DocumentState {
	/// The full text content of the document.
	content: String,
	/// Decorations from the last scan of `content`.
	decorations: Decorations,
}

/// Workspace-level state shared across all LSP requests.
#[derive(Debug, Default)]
struct WorkspaceState {
	/// The workspace root path.
	root: Option<PathBuf>,
	/// Config loaded from `hbs.toml` at the root.
	config: HbsConfig,
	/// Open documents keyed by URI.
	documents: HashMap<Uri, DocumentState>,
}

impl WorkspaceState {
	/// Reload `hbs.toml`. An invalid file keeps the previous config.
	fn reload_config(&mut self) {
		let Some(root) = &self.root else {
			return;
		};

		match HbsConfig::load_or_default(root) {
			Ok(config) => self.config = config,
			Err(e) => tracing::warn!(error = %e, "failed to load config, keeping previous"),
		}
	}

	/// Scan a document and cache its content and decorations.
	fn scan_document(&mut self, uri: &Uri, content: String) {
		let decorations = scan(&content, &self.config.styles);
		self.documents.insert(
			uri.clone(),
			DocumentState {
				content,
				decorations,
			},
		);
	}

	/// Apply an edit batch to a document and rescan it. Returns `false` when
	/// there was nothing to apply.
	fn apply_document_changes(
		&mut self,
		uri: &Uri,
		changes: Vec<TextDocumentContentChangeEvent>,
	) -> bool {
		let content = match self.documents.get(uri) {
			Some(doc) => apply_content_changes(doc.content.clone(), changes),
			// Not tracked yet, so the last change must carry the full content.
			None => {
				let Some(change) = changes.into_iter().next_back() else {
					return false;
				};
				change.text
			}
		};

		self.scan_document(uri, content);
		true
	}

	/// Rescan every open document, e.g. after the styles changed.
	fn rescan_documents(&mut self) {
		let styles = &self.config.styles;
		for document in self.documents.values_mut() {
			document.decorations = scan(&document.content, styles);
		}
	}

	fn resolver(&self) -> Option<PartialResolver> {
		let root = self.root.as_ref()?;
		Some(self.config.resolver(root))
	}
}

fn to_lsp_position(point: Point) -> Position {
	Position {
		line: point.line as u32,
		character: point.character as u32,
	}
}

fn to_lsp_range(range: hbs_core::Range) -> Range {
	Range {
		start: to_lsp_position(range.start),
		end: to_lsp_position(range.end),
	}
}

fn from_lsp_position(position: Position) -> Point {
	Point::new(position.line as usize, position.character as usize)
}

fn from_lsp_range(range: Range) -> hbs_core::Range {
	hbs_core::Range::new(from_lsp_position(range.start), from_lsp_position(range.end))
}

/// The text covered by `range`, or `None` when the range is out of bounds.
fn selected_text(content: &str, range: Range) -> Option<&str> {
	let span = LineTable::new(content).span_of(from_lsp_range(range))?;
	content.get(span.start..span.end)
}

/// Apply content changes in order. Changes with a `range` are incremental;
/// changes without one replace the whole document.
fn apply_content_changes(
	mut content: String,
	changes: Vec<TextDocumentContentChangeEvent>,
) -> String {
	for change in changes {
		let Some(range) = change.range else {
			content = change.text;
			continue;
		};

		let span = LineTable::new(&content).span_of(from_lsp_range(range));
		match span {
			Some(span) if span.start <= span.end => {
				content.replace_range(span.start..span.end, &change.text);
			}
			_ => tracing::warn!(?range, "ignoring change outside the document"),
		}
	}

	content
}

/// Read the command argument at `index`.
fn command_argument<T: DeserializeOwned>(arguments: &[Value], index: usize) -> LspResult<T> {
	let value = arguments
		.get(index)
		.cloned()
		.ok_or_else(|| RpcError::invalid_params(format!("missing command argument {index}")))?;

	serde_json::from_value(value)
		.map_err(|e| RpcError::invalid_params(format!("invalid command argument {index}: {e}")))
}

/// The HBS language server.
#[derive(Debug)]
pub struct HbsLanguageServer {
	client: Client,
	state: RwLock<WorkspaceState>,
}

impl HbsLanguageServer {
	pub fn new(client: Client) -> Self {
		Self {
			client,
			state: RwLock::new(WorkspaceState::default()),
		}
	}

	/// Send the cached decorations of a single document.
	async fn publish_decorations_for(&self, uri: &Uri) {
		let params = {
			let state = self.state.read().await;
			compute_decorations(&state, uri)
		};

		if let Some(params) = params {
			self.client
				.send_notification::<PublishDecorations>(params)
				.await;
		}
	}

	/// Handle a document being opened or changed: scan it and publish its
	/// decorations.
	async fn on_document_change(&self, uri: &Uri, content: String) {
		{
			let mut state = self.state.write().await;
			state.scan_document(uri, content);
		}
		self.publish_decorations_for(uri).await;
	}

	async fn apply_text_edit(&self, uri: Uri, edit: TextEdit) {
		let mut changes = HashMap::new();
		changes.insert(uri, vec![edit]);
		let edit = WorkspaceEdit {
			changes: Some(changes),
			..Default::default()
		};

		match self.client.apply_edit(edit).await {
			Ok(response) if !response.applied => {
				tracing::warn!(reason = ?response.failure_reason, "client rejected edit");
			}
			Ok(_) => {}
			Err(e) => tracing::warn!(error = %e, "failed to apply edit"),
		}
	}

	async fn show_error(&self, error: &HbsError) {
		self.client
			.show_message(MessageType::ERROR, error.to_string())
			.await;
	}

	async fn create_partial_command(&self, arguments: &[Value]) -> LspResult<Option<Value>> {
		let uri: Uri = command_argument(arguments, 0)?;
		let range: Range = command_argument(arguments, 1)?;
		let name = arguments
			.get(2)
			.and_then(Value::as_str)
			.unwrap_or_default();

		let result = {
			let state = self.state.read().await;
			compute_create_partial(&state, &uri, range, name)
		};

		match result {
			Ok((created, edit)) => {
				self.apply_text_edit(uri, edit).await;
				self.client
					.log_message(
						MessageType::INFO,
						format!("created partial `{}`", created.path.display()),
					)
					.await;
				Ok(Some(Value::String(created.path.display().to_string())))
			}
			Err(error) => {
				self.show_error(&error).await;
				Ok(None)
			}
		}
	}

	async fn toggle_comment_command(&self, arguments: &[Value]) -> LspResult<Option<Value>> {
		let uri: Uri = command_argument(arguments, 0)?;
		let range: Range = command_argument(arguments, 1)?;

		let edit = {
			let state = self.state.read().await;
			compute_toggle_comment(&state, &uri, range)
		};

		if let Some(edit) = edit {
			self.apply_text_edit(uri, edit).await;
		}

		Ok(None)
	}

	async fn open_partial_command(&self, arguments: &[Value]) -> LspResult<Option<Value>> {
		let name: String = command_argument(arguments, 0)?;
		let params = {
			let state = self.state.read().await;
			compute_open_partial(&state, &name)
		};

		let Some(params) = params else {
			tracing::debug!(name, "no partial file to open");
			return Ok(None);
		};

		if let Err(e) = self.client.show_document(params).await {
			tracing::warn!(error = %e, name, "failed to open partial");
		}

		Ok(None)
	}
}

impl LanguageServer for HbsLanguageServer {
	async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
		// Prefer `workspace_folders`, falling back to the deprecated `root_uri`
		// for older clients.
		let root = params
			.workspace_folders
			.as_ref()
			.and_then(|folders| folders.first())
			.and_then(|folder| folder.uri.to_file_path().map(std::borrow::Cow::into_owned))
			.or_else(|| {
				#[allow(deprecated)]
				params
					.root_uri
					.as_ref()
					.and_then(|uri| uri.to_file_path().map(std::borrow::Cow::into_owned))
			});

		{
			let mut state = self.state.write().await;
			tracing::info!(root = ?root, "initializing workspace");
			state.root = root;
			state.reload_config();
		}

		Ok(InitializeResult {
			capabilities: ServerCapabilities {
				text_document_sync: Some(TextDocumentSyncCapability::Options(
					TextDocumentSyncOptions {
						open_close: Some(true),
						change: Some(TextDocumentSyncKind::INCREMENTAL),
						save: Some(TextDocumentSyncSaveOptions::Supported(true)),
						..Default::default()
					},
				)),
				hover_provider: Some(HoverProviderCapability::Simple(true)),
				definition_provider: Some(OneOf::Left(true)),
				document_link_provider: Some(DocumentLinkOptions {
					resolve_provider: Some(false),
					work_done_progress_options: WorkDoneProgressOptions::default(),
				}),
				code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
				execute_command_provider: Some(ExecuteCommandOptions {
					commands: vec![
						CREATE_PARTIAL_COMMAND.to_string(),
						TOGGLE_COMMENT_COMMAND.to_string(),
						OPEN_PARTIAL_COMMAND.to_string(),
					],
					work_done_progress_options: WorkDoneProgressOptions::default(),
				}),
				..Default::default()
			},
			server_info: Some(ServerInfo {
				name: "hbs-lsp".to_string(),
				version: Some(env!("CARGO_PKG_VERSION").to_string()),
			}),
			offset_encoding: None,
		})
	}

	async fn initialized(&self, _: InitializedParams) {
		self.client
			.log_message(MessageType::INFO, "hbs language server initialized")
			.await;
	}

	async fn shutdown(&self) -> LspResult<()> {
		Ok(())
	}

	async fn did_open(&self, params: DidOpenTextDocumentParams) {
		let uri = params.text_document.uri;
		let content = params.text_document.text;
		self.on_document_change(&uri, content).await;
	}

	async fn did_change(&self, params: DidChangeTextDocumentParams) {
		let uri = params.text_document.uri;

		let changed = {
			let mut state = self.state.write().await;
			state.apply_document_changes(&uri, params.content_changes)
		};

		if changed {
			self.publish_decorations_for(&uri).await;
		}
	}

	async fn did_save(&self, params: DidSaveTextDocumentParams) {
		let uri = &params.text_document.uri;
		let is_config = CONFIG_FILE_CANDIDATES
			.iter()
			.any(|candidate| uri.path().as_str().ends_with(candidate));

		if !is_config {
			return;
		}

		let uris: Vec<Uri> = {
			let mut state = self.state.write().await;
			state.reload_config();
			state.rescan_documents();
			state.documents.keys().cloned().collect()
		};

		for uri in &uris {
			self.publish_decorations_for(uri).await;
		}
	}

	async fn did_close(&self, params: DidCloseTextDocumentParams) {
		let mut state = self.state.write().await;
		state.documents.remove(&params.text_document.uri);
	}

	async fn hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
		let uri = &params.text_document_position_params.text_document.uri;
		let position = params.text_document_position_params.position;

		let state = self.state.read().await;
		Ok(compute_hover(&state, uri, position))
	}

	async fn goto_definition(
		&self,
		params: GotoDefinitionParams,
	) -> LspResult<Option<GotoDefinitionResponse>> {
		let uri = &params.text_document_position_params.text_document.uri;
		let position = params.text_document_position_params.position;

		let state = self.state.read().await;
		Ok(compute_goto_definition(&state, uri, position))
	}

	async fn document_link(&self, params: DocumentLinkParams) -> LspResult<Option<Vec<DocumentLink>>> {
		let state = self.state.read().await;
		let links = compute_document_links(&state, &params.text_document.uri);

		if links.is_empty() {
			Ok(None)
		} else {
			Ok(Some(links))
		}
	}

	async fn code_action(&self, params: CodeActionParams) -> LspResult<Option<CodeActionResponse>> {
		let uri = &params.text_document.uri;
		let range = params.range;

		let state = self.state.read().await;
		let actions = compute_code_actions(&state, uri, range);

		if actions.is_empty() {
			Ok(None)
		} else {
			Ok(Some(actions))
		}
	}

	async fn execute_command(&self, params: ExecuteCommandParams) -> LspResult<Option<Value>> {
		tracing::debug!(command = %params.command, "executing command");

		match params.command.as_str() {
			CREATE_PARTIAL_COMMAND => self.create_partial_command(&params.arguments).await,
			TOGGLE_COMMENT_COMMAND => self.toggle_comment_command(&params.arguments).await,
			OPEN_PARTIAL_COMMAND => self.open_partial_command(&params.arguments).await,
			command => Err(RpcError::invalid_params(format!("unknown command `{command}`"))),
		}
	}
}

// ---------------------------------------------------------------------------
// Decorations
// ---------------------------------------------------------------------------

/// The decorations notification for a document, or `None` when it is not
/// open.
fn compute_decorations(state: &WorkspaceState, uri: &Uri) -> Option<DecorationsParams> {
	let doc = state.documents.get(uri)?;

	Some(DecorationsParams {
		uri: uri.clone(),
		buckets: Vec::from(doc.decorations.clone().into_buckets()),
	})
}

// ---------------------------------------------------------------------------
// Hover
// ---------------------------------------------------------------------------

/// Hover text for the partial name or binding under the cursor. Partial
/// hovers also say where the partial file lives.
fn compute_hover(state: &WorkspaceState, uri: &Uri, position: Position) -> Option<Hover> {
	let doc = state.documents.get(uri)?;
	let offset = LineTable::new(&doc.content).offset_at(from_lsp_position(position))?;

	let decoration = [&doc.decorations.partial, &doc.decorations.variable]
		.into_iter()
		.flat_map(|bucket| bucket.iter())
		.find(|decoration| decoration.hover.is_some() && decoration.span.contains(offset))?;

	let mut value = decoration.hover.clone()?;
	if let Some(Action::OpenPartial { name }) = &decoration.action {
		match state.resolver().and_then(|resolver| resolver.resolve(name)) {
			Some(path) => {
				let shown = state
					.root
					.as_deref()
					.and_then(|root| path.strip_prefix(root).ok())
					.unwrap_or(&path);
				value.push_str(&format!("\n\n`{}`", shown.display()));
			}
			None => value.push_str("\n\n*Partial file not found*"),
		}
	}

	Some(Hover {
		contents: HoverContents::Markup(MarkupContent {
			kind: MarkupKind::Markdown,
			value,
		}),
		range: Some(to_lsp_range(decoration.range)),
	})
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Go to the partial file named at the cursor, opened at its first line.
fn compute_goto_definition(
	state: &WorkspaceState,
	uri: &Uri,
	position: Position,
) -> Option<GotoDefinitionResponse> {
	let doc = state.documents.get(uri)?;
	let offset = LineTable::new(&doc.content).offset_at(from_lsp_position(position))?;
	let name = partial_name_at(&doc.content, offset)?;
	let path = state.resolver()?.resolve(&name)?;

	Some(GotoDefinitionResponse::Scalar(Location {
		uri: Uri::from_file_path(&path)?,
		range: Range::default(),
	}))
}

/// Where to open the partial `name`, or `None` when no file matches.
fn compute_open_partial(state: &WorkspaceState, name: &str) -> Option<ShowDocumentParams> {
	let path = state.resolver()?.resolve(name)?;

	Some(ShowDocumentParams {
		uri: Uri::from_file_path(&path)?,
		external: Some(false),
		take_focus: Some(true),
		selection: Some(Range::default()),
	})
}

/// One link per partial reference that resolves to a file.
fn compute_document_links(state: &WorkspaceState, uri: &Uri) -> Vec<DocumentLink> {
	let (Some(doc), Some(resolver)) = (state.documents.get(uri), state.resolver()) else {
		return Vec::new();
	};

	doc.decorations
		.partial
		.iter()
		.filter_map(|decoration| {
			let Some(Action::OpenPartial { name }) = &decoration.action else {
				return None;
			};
			let path = resolver.resolve(name)?;

			Some(DocumentLink {
				range: to_lsp_range(decoration.range),
				target: Some(Uri::from_file_path(&path)?),
				tooltip: decoration.hover.clone(),
				data: None,
			})
		})
		.collect()
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

/// The edit toggling comment wrapping of `range`. An empty range toggles the
/// trimmed text of its line and replaces the whole line. Blank lines produce
/// no edit.
fn compute_toggle_comment(state: &WorkspaceState, uri: &Uri, range: Range) -> Option<TextEdit> {
	let doc = state.documents.get(uri)?;
	let table = LineTable::new(&doc.content);

	let (span, text) = if range.start == range.end {
		let span = table.line_span(range.start.line as usize)?;
		(span, doc.content[span.start..span.end].trim())
	} else {
		let span = table.span_of(from_lsp_range(range))?;
		(span, doc.content.get(span.start..span.end)?)
	};

	if text.trim().is_empty() {
		return None;
	}

	Some(TextEdit {
		range: to_lsp_range(table.range_of(span)),
		new_text: comment::toggle(text),
	})
}

/// Write the text selected by `range` to a new partial and build the edit
/// that replaces the selection with a reference to it.
fn compute_create_partial(
	state: &WorkspaceState,
	uri: &Uri,
	range: Range,
	name: &str,
) -> HbsResult<(CreatedPartial, TextEdit)> {
	let root = state.root.as_deref().ok_or(HbsError::MissingWorkspace)?;
	let selection = state
		.documents
		.get(uri)
		.and_then(|doc| selected_text(&doc.content, range))
		.unwrap_or_default();

	let created = create_partial(&state.config.partials_dir(root), name, selection)?;
	let edit = TextEdit {
		range,
		new_text: created.reference.clone(),
	};

	Ok((created, edit))
}

/// Offers "Toggle comment" wherever there is text to toggle, and "Extract to
/// partial" for non-blank selections. The extract command carries
/// `[uri, range]`; clients append the partial name before executing it.
fn compute_code_actions(
	state: &WorkspaceState,
	uri: &Uri,
	range: Range,
) -> Vec<CodeActionOrCommand> {
	let mut actions = Vec::new();

	if let Some(edit) = compute_toggle_comment(state, uri, range) {
		let mut changes = HashMap::new();
		changes.insert(uri.clone(), vec![edit]);

		actions.push(CodeActionOrCommand::CodeAction(CodeAction {
			title: "Toggle Handlebars comment".to_string(),
			kind: Some(CodeActionKind::REFACTOR_REWRITE),
			edit: Some(WorkspaceEdit {
				changes: Some(changes),
				..Default::default()
			}),
			..Default::default()
		}));
	}

	let has_selection = state
		.documents
		.get(uri)
		.and_then(|doc| selected_text(&doc.content, range))
		.is_some_and(|text| !text.trim().is_empty());

	if has_selection {
		actions.push(CodeActionOrCommand::CodeAction(CodeAction {
			title: "Extract to partial".to_string(),
			kind: Some(CodeActionKind::REFACTOR_EXTRACT),
			command: Some(Command {
				title: "Extract to partial".to_string(),
				command: CREATE_PARTIAL_COMMAND.to_string(),
				arguments: Some(vec![serde_json::json!(uri), serde_json::json!(range)]),
			}),
			..Default::default()
		}));
	}

	actions
}

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`. Stdout is
/// reserved for JSON-RPC. Does nothing when a subscriber is already set.
pub fn init_logging() {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("hbs_lsp=info,hbs_core=warn"));
	let _ = tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(filter)
		.with_ansi(false)
		.try_init();
}

/// Start the LSP server on stdin/stdout. This is used by the `hbs lsp` CLI
/// subcommand.
pub async fn run_server() {
	init_logging();

	let stdin = tokio::io::stdin();
	let stdout = tokio::io::stdout();

	let (service, socket) = tower_lsp_server::LspService::new(HbsLanguageServer::new);
	tower_lsp_server::Server::new(stdin, stdout, socket)
		.serve(service)
		.await;
}
