use chrono::Utc;

use crate::error::AppResult;
use crate::services::term_repository::TermRepository;
use crate::validation::normalize_keyword;

/// 首次启动时写入的默认词条：(keyword, definition, category)
pub const DEFAULT_TERMS: &[(&str, &str, &str)] = &[
    (
        "Blockchain",
        "Распределенная база данных, которая хранит информацию о транзакциях в виде цепочки блоков. Каждый блок содержит криптографическую хеш-функцию предыдущего блока, временную метку и данные транзакций.",
        "Основные понятия",
    ),
    (
        "Consensus",
        "Механизм достижения согласия между узлами распределенной сети относительно текущего состояния системы. Примеры: Proof of Work (PoW), Proof of Stake (PoS), Byzantine Fault Tolerance (BFT).",
        "Механизмы консенсуса",
    ),
    (
        "Smart Contract",
        "Программный код, который автоматически исполняется при выполнении определенных условий. Смарт-контракты хранятся и выполняются на блокчейне, обеспечивая прозрачность и неизменяемость.",
        "Технологии",
    ),
    (
        "Ethereum",
        "Децентрализованная платформа с открытым исходным кодом для создания смарт-контрактов и децентрализованных приложений (DApps). Использует собственную криптовалюту Ether (ETH).",
        "Платформы",
    ),
    (
        "Hyperledger Fabric",
        "Модульная блокчейн-платформа для корпоративного использования. Поддерживает приватные каналы, разрешенную сеть и гибкие механизмы консенсуса. Разработана Linux Foundation.",
        "Платформы",
    ),
    (
        "TPS",
        "Transactions Per Second - метрика производительности блокчейн-платформы, измеряющая количество транзакций, которые система может обработать за одну секунду.",
        "Метрики производительности",
    ),
    (
        "Latency",
        "Задержка - время, необходимое для подтверждения транзакции в блокчейн-сети. Важная метрика производительности, влияющая на пользовательский опыт.",
        "Метрики производительности",
    ),
    (
        "Gas",
        "Единица измерения вычислительных усилий, необходимых для выполнения операций в блокчейне Ethereum. Используется для оплаты комиссий за транзакции и выполнение смарт-контрактов.",
        "Экономика блокчейна",
    ),
    (
        "Proof of Work",
        "Алгоритм консенсуса, требующий от участников сети решения сложных криптографических задач для добавления новых блоков. Используется в Bitcoin, обеспечивает высокую безопасность, но энергоемкий.",
        "Механизмы консенсуса",
    ),
    (
        "Proof of Stake",
        "Алгоритм консенсуса, где право создания нового блока зависит от доли криптовалюты, которой владеет участник. Более энергоэффективен по сравнению с PoW.",
        "Механизмы консенсуса",
    ),
    (
        "Sharding",
        "Метод масштабирования блокчейна путем разделения сети на несколько подсетей (шардов), каждая из которых обрабатывает свою часть транзакций параллельно.",
        "Масштабирование",
    ),
    (
        "Throughput",
        "Пропускная способность - общее количество данных или транзакций, которое может быть обработано системой за определенный период времени.",
        "Метрики производительности",
    ),
];

/// 空库时在一个事务里写入默认词条，返回写入条数；已有数据则不做任何改动
pub async fn seed_if_empty(repo: &TermRepository) -> AppResult<usize> {
    let existing = repo.count().await?;
    if existing > 0 {
        tracing::info!("✓ 数据库已包含 {} 个词条，跳过初始化", existing);
        return Ok(0);
    }

    let mut tx = repo.pool().begin().await?;
    let now = Utc::now();
    for (keyword, definition, category) in DEFAULT_TERMS {
        sqlx::query(
            "INSERT INTO terms (keyword, keyword_normalized, definition, category, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(*keyword)
        .bind(normalize_keyword(keyword))
        .bind(*definition)
        .bind(*category)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!("✓ 已初始化 {} 个默认词条", DEFAULT_TERMS.len());
    Ok(DEFAULT_TERMS.len())
}
