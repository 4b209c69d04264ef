//! Command handlers. Each takes the synchronizer as its context and writes
//! user-facing output to `out`; failures bubble up to `main`.

use std::io::Write;

use anyhow::{bail, Result};
use board_core::validation::ValidationErrors;
use board_core::{
    Album, Comment, Photo, Post, PostForm, PostPatch, Synchronizer, TodoFilter, Transport, User,
    UserForm, UserPatch,
};
use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Command {
    /// Posts and their comments
    Posts {
        #[command(subcommand)]
        action: PostAction,
    },
    /// User administration
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Albums and their photos
    Albums {
        #[command(subcommand)]
        action: AlbumAction,
    },
    /// Todos with local completion marks
    Todos(TodoArgs),
    /// Dashboard counts
    Stats,
}

#[derive(Subcommand)]
pub enum PostAction {
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// A post with its comments
    Show { id: u64 },
    Create(PostFields),
    /// Replace a post; omitted fields keep their current value
    Update {
        id: u64,
        #[command(flatten)]
        fields: PostFields,
    },
    /// Send only the given fields
    Patch {
        id: u64,
        #[command(flatten)]
        fields: PostFields,
    },
    Delete { id: u64 },
}

#[derive(Args, Default)]
pub struct PostFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub body: Option<String>,
    #[arg(long)]
    pub user_id: Option<u64>,
}

#[derive(Subcommand)]
pub enum UserAction {
    List,
    Show { id: u64 },
    Create(UserFields),
    /// Replace a user; omitted fields keep their current value
    Update {
        id: u64,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Send only the given contact fields
    Patch {
        id: u64,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete { id: u64 },
}

#[derive(Args, Default)]
pub struct UserFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub suite: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub zipcode: Option<String>,
}

#[derive(Subcommand)]
pub enum AlbumAction {
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    Photos { id: u64 },
}

#[derive(Args)]
pub struct TodoArgs {
    /// all, pending, or completed
    #[arg(long, default_value = "all")]
    pub filter: TodoFilter,
    /// Mark a todo done locally for this run (repeatable)
    #[arg(long = "toggle", value_name = "ID")]
    pub toggles: Vec<u64>,
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

pub fn run<T: Transport>(
    command: Command,
    sync: &mut Synchronizer<T>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Posts { action } => posts(action, sync, out),
        Command::Users { action } => users(action, sync, out),
        Command::Albums { action } => albums(action, sync, out),
        Command::Todos(args) => todos(args, sync, out),
        Command::Stats => stats(sync, out),
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

fn posts<T: Transport>(
    action: PostAction,
    sync: &mut Synchronizer<T>,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        PostAction::List { limit } => {
            for post in sync.list::<Post>()?.iter().take(limit) {
                writeln!(out, "#{} [user {}] {}", post.id, post.user_id, post.title)?;
            }
        }
        PostAction::Show { id } => {
            let post: Post = sync.get(id)?;
            writeln!(out, "#{} {}\n\n{}\n", post.id, post.title, post.body)?;
            let comments: Vec<Comment> = sync.children(id)?;
            writeln!(out, "{} comments", comments.len())?;
            for c in comments {
                writeln!(out, "- {} <{}>: {}", c.name, c.email, c.body)?;
            }
        }
        PostAction::Create(fields) => {
            let draft = checked(fields.apply(PostForm::default()).submit())?;
            let post: Post = sync.create(&draft)?;
            writeln!(out, "Post created (#{})", post.id)?;
        }
        PostAction::Update { id, fields } => {
            let current: Post = sync.get(id)?;
            let form = fields.apply(PostForm::from_draft(&current.to_draft()));
            let draft = checked(form.submit())?;
            sync.update::<Post>(id, &draft)?;
            writeln!(out, "Post updated (#{id})")?;
        }
        PostAction::Patch { id, fields } => {
            let patch = fields.into_patch()?;
            sync.patch::<Post>(id, &patch)?;
            writeln!(out, "Post patched (#{id})")?;
        }
        PostAction::Delete { id } => {
            sync.remove::<Post>(id)?;
            writeln!(out, "Post deleted (#{id})")?;
        }
    }
    Ok(())
}

impl PostFields {
    fn apply(self, mut form: PostForm) -> PostForm {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(body) = self.body {
            form.body = body;
        }
        if let Some(user_id) = self.user_id {
            form.user_id = user_id;
        }
        form
    }

    fn into_patch(self) -> Result<PostPatch> {
        if self.title.is_none() && self.body.is_none() && self.user_id.is_none() {
            bail!("nothing to patch");
        }
        if self.user_id == Some(0) {
            bail!("user id must be at least 1");
        }
        Ok(PostPatch {
            user_id: self.user_id,
            title: self.title,
            body: self.body,
        })
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn users<T: Transport>(
    action: UserAction,
    sync: &mut Synchronizer<T>,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        UserAction::List => {
            for u in sync.list::<User>()? {
                writeln!(out, "#{} {} (@{}) {}", u.id, u.name, u.username, u.email)?;
            }
        }
        UserAction::Show { id } => {
            let u: User = sync.get(id)?;
            writeln!(out, "#{} {} (@{})", u.id, u.name, u.username)?;
            writeln!(out, "email:   {}", u.email)?;
            writeln!(out, "phone:   {}", u.phone)?;
            writeln!(out, "website: {}", u.website)?;
            writeln!(out, "company: {} ({})", u.company.name, u.company.catch_phrase)?;
            writeln!(
                out,
                "address: {}, {}, {} {}",
                u.address.street, u.address.suite, u.address.city, u.address.zipcode
            )?;
        }
        UserAction::Create(fields) => {
            let draft = checked(fields.apply(UserForm::default()).submit(None))?;
            let user: User = sync.create(&draft)?;
            writeln!(out, "User created (#{})", user.id)?;
        }
        UserAction::Update { id, fields } => {
            let current: User = sync.get(id)?;
            let form = fields.apply(UserForm::from_user(&current));
            let draft = checked(form.submit(Some(&current)))?;
            sync.update::<User>(id, &draft)?;
            writeln!(out, "User updated (#{id})")?;
        }
        UserAction::Patch { id, fields } => {
            let patch = fields.into_patch()?;
            sync.patch::<User>(id, &patch)?;
            writeln!(out, "User patched (#{id})")?;
        }
        UserAction::Delete { id } => {
            sync.remove::<User>(id)?;
            writeln!(out, "User removed (#{id})")?;
        }
    }
    Ok(())
}

impl UserFields {
    fn apply(self, mut form: UserForm) -> UserForm {
        let slots = [
            (self.name, &mut form.name),
            (self.username, &mut form.username),
            (self.email, &mut form.email),
            (self.phone, &mut form.phone),
            (self.website, &mut form.website),
            (self.company, &mut form.company_name),
            (self.street, &mut form.street),
            (self.suite, &mut form.suite),
            (self.city, &mut form.city),
            (self.zipcode, &mut form.zipcode),
        ];
        for (value, slot) in slots {
            if let Some(v) = value {
                *slot = v;
            }
        }
        form
    }

    /// Only top-level contact fields; company and address are replaced
    /// whole through `update`.
    fn into_patch(self) -> Result<UserPatch> {
        if self.company.is_some()
            || self.street.is_some()
            || self.suite.is_some()
            || self.city.is_some()
            || self.zipcode.is_some()
        {
            bail!("company and address fields can only be changed with `users update`");
        }
        let patch = UserPatch {
            name: self.name,
            username: self.username,
            email: self.email,
            phone: self.phone,
            website: self.website,
            ..UserPatch::default()
        };
        if patch == UserPatch::default() {
            bail!("nothing to patch");
        }
        Ok(patch)
    }
}

// ---------------------------------------------------------------------------
// Albums, todos, stats
// ---------------------------------------------------------------------------

fn albums<T: Transport>(
    action: AlbumAction,
    sync: &mut Synchronizer<T>,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        AlbumAction::List { limit } => {
            for a in sync.list::<Album>()?.iter().take(limit) {
                writeln!(out, "#{} [user {}] {}", a.id, a.user_id, a.title)?;
            }
        }
        AlbumAction::Photos { id } => {
            let photos: Vec<Photo> = sync.children(id)?;
            writeln!(out, "{} photos", photos.len())?;
            for p in photos {
                writeln!(out, "#{} {} {}", p.id, p.title, p.url)?;
            }
        }
    }
    Ok(())
}

fn todos<T: Transport>(
    args: TodoArgs,
    sync: &mut Synchronizer<T>,
    out: &mut impl Write,
) -> Result<()> {
    for id in args.toggles {
        sync.toggle_todo(id);
    }
    let summary = sync.todo_summary()?;
    writeln!(out, "{} completed, {} pending", summary.completed, summary.pending)?;
    for t in sync.todos_filtered(args.filter)?.iter().take(args.limit) {
        let mark = if t.completed { 'x' } else { ' ' };
        writeln!(out, "[{mark}] #{} {}", t.id, t.title)?;
    }
    Ok(())
}

fn stats<T: Transport>(sync: &mut Synchronizer<T>, out: &mut impl Write) -> Result<()> {
    let s = sync.dashboard()?;
    writeln!(out, "posts:  {}", s.posts)?;
    writeln!(out, "albums: {}", s.albums)?;
    writeln!(out, "todos:  {} ({}% completed)", s.todos, s.completion_rate)?;
    writeln!(out, "users:  {}", s.users)?;
    Ok(())
}

/// Print each invalid field to stderr before giving up on the form.
fn checked<D>(result: Result<D, ValidationErrors>) -> Result<D> {
    result.map_err(|errors| {
        for (field, message) in errors.iter() {
            eprintln!("  {field}: {message}");
        }
        errors.into()
    })
}
