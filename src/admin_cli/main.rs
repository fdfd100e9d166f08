use clap::{Parser, Subcommand};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use std::fs;
use std::path::Path;

// Definimos la estructura de comandos del CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Utilidad de línea de comandos para administrar Cuaderno.
/// Permite sembrar el esquema, vaciar las tablas y comprobar la conexión.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Comandos para trabajar con la base de datos.
    Db {
        #[command(subcommand)]
        db_command: DbCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Aplica los scripts SQL de la carpeta /dump (esquema y datos iniciales).
    Seed {
        /// Carpeta con los scripts SQL.
        #[arg(short, long, default_value = "dump")]
        dir: String,
    },
    /// Elimina TODAS las tablas de contenido. ¡Úsalo con cuidado!
    Wipe {
        /// Confirmación explícita; sin ella no se borra nada.
        #[arg(long)]
        yes: bool,
    },
    /// Comprueba la conexión con la base de datos configurada.
    Ping,
}

async fn get_db_connection() -> Result<DatabaseConnection, Box<dyn std::error::Error>> {
    let db_url = std::env::var("DATABASE_URL")
        .map_err(|_| "DATABASE_URL no está definida en el entorno")?;
    Ok(Database::connect(db_url).await?)
}

async fn apply_script(
    db: &DatabaseConnection,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let sql = fs::read_to_string(path)?;
    db.execute_unprepared(&sql).await?;
    println!("Aplicado: {}", path.display());
    Ok(())
}

async fn seed(dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = get_db_connection().await?;
    let base = Path::new(dir);

    // El orden importa: primero el esquema, después los datos
    for name in ["schema.sql", "seed.sql"] {
        let path = base.join(name);
        if path.exists() {
            apply_script(&db, &path).await?;
        } else {
            println!("Aviso: no existe {}, se omite", path.display());
        }
    }

    println!("Base de datos sembrada correctamente");
    Ok(())
}

async fn wipe(confirmed: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("Operación destructiva: repite el comando con --yes".into());
    }

    let db = get_db_connection().await?;
    db.execute_unprepared("DROP TABLE IF EXISTS prompts, snippets, links, guides CASCADE")
        .await?;
    println!("Tablas de contenido eliminadas");
    Ok(())
}

async fn ping() -> Result<(), Box<dyn std::error::Error>> {
    let db = get_db_connection().await?;
    cuaderno::database::ping(&db).await?;
    println!("Conexión correcta");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    match cli.command {
        Commands::Db { db_command } => match db_command {
            DbCommand::Seed { dir } => seed(&dir).await,
            DbCommand::Wipe { yes } => wipe(yes).await,
            DbCommand::Ping => ping().await,
        },
    }
}
